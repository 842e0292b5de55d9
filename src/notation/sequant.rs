use itertools::Itertools;
use num_traits::One;
use rustc_hash::FxHashMap;

use crate::contraction::{Index, TensorElement};
use crate::notation::{sign_and_magnitude, Term};
use crate::types::Space;

fn index_label(index: &Index) -> String {
    let base = match index.space {
        Space::Occupied => 'i',
        Space::Virtual => 'e',
        Space::Active => 'u',
    };
    format!("{base}{}", index.id + 1)
}

fn labels<'a>(indices: impl Iterator<Item = &'a Index>) -> String {
    indices.map(index_label).join(",")
}

/// Renders a tensor as `name{creators;annihilators}`.
///
/// The Hamiltonian `H` is split into the Fock operator `f` and the two-body
/// integrals `g` by its rank.
fn tensor(element: &TensorElement) -> String {
    let name = match (element.name(), element.creators().count()) {
        ("H", 1) => "f",
        ("H", 2) => "g",
        (name, _) => name,
    };
    format!(
        "{name}{{{};{}}}",
        labels(element.creators()),
        labels(element.annihilators())
    )
}

/// The antisymmetrizer over all result indices, with creators and
/// annihilators exchanged, preceded by `1/p` if the prefactor is not one.
fn antisymmetrizer(term: &Term) -> Option<String> {
    let result = term.contraction.result();
    if result.is_scalar() {
        return None;
    }
    let operator = format!(
        "A{{{};{}}}",
        labels(result.annihilators()),
        labels(result.creators())
    );
    let prefactor = term.symmetrization.prefactor();
    Some(if prefactor.is_one() {
        operator
    } else {
        format!("1/{prefactor} {operator}")
    })
}

fn term_line(term: &Term) -> String {
    let (negative, magnitude) = sign_and_magnitude(term.contraction.factor());
    let mut parts = vec![if negative { "-" } else { "+" }.to_owned()];
    parts.extend(magnitude.map(|magnitude| magnitude.to_string()));
    parts.extend(antisymmetrizer(term));
    parts.extend(term.contraction.tensors().iter().map(tensor));
    format!("  {}", parts.join(" "))
}

/// Renders the terms grouped by result tensor.
///
/// Every distinct result opens a `result =` header followed by its terms, one
/// per line. Groups appear in the order their result first occurs; terms keep
/// their input order.
#[must_use]
pub fn to_sequant(terms: &[Term]) -> String {
    let mut positions = FxHashMap::<&TensorElement, usize>::default();
    let mut groups: Vec<(&TensorElement, Vec<&Term>)> = Vec::new();
    for term in terms {
        let result = term.contraction.result();
        let position = *positions.entry(result).or_insert_with(|| {
            groups.push((result, Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(term);
    }

    let mut sequant = String::new();
    for (result, members) in groups {
        sequant += &format!("{} =\n", tensor(result));
        for term in members {
            sequant += &term_line(term);
            sequant.push('\n');
        }
    }
    sequant
}
