use itertools::Itertools;

use crate::contraction::{Contraction, Index, TensorElement};
use crate::notation::sign_and_magnitude;
use crate::types::Space;

fn index_label(index: &Index) -> String {
    let base = match index.space {
        Space::Occupied => 'o',
        Space::Virtual => 'v',
        Space::Active => 'a',
    };
    format!("{base}_{}", index.id + 1)
}

fn tensor(element: &TensorElement) -> String {
    format!(
        "{}^{{{}}}_{{{}}}",
        element.name(),
        element.annihilators().map(index_label).join(" "),
        element.creators().map(index_label).join(" ")
    )
}

fn line(contraction: &Contraction) -> String {
    let (negative, magnitude) = sign_and_magnitude(contraction.factor());
    let mut parts = vec![
        tensor(contraction.result()),
        if negative { "-=" } else { "+=" }.to_owned(),
    ];
    parts.extend(magnitude.map(|magnitude| magnitude.to_string()));
    parts.extend(contraction.tensors().iter().map(tensor));
    parts.join(" ")
}

/// Renders every contraction as one line of the form
/// `R^{v_2 v_1}_{o_1 o_2} += 1/2 H^{...}_{...} T^{...}_{...}`.
///
/// Superscripts hold annihilators and subscripts creators; the factor is
/// omitted if its magnitude is one.
#[must_use]
pub fn to_tex(contractions: &[Contraction]) -> String {
    contractions
        .iter()
        .map(|contraction| line(contraction) + "\n")
        .collect()
}
