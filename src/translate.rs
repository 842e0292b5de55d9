//! Batch translation of a whole export.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::canonicalize::canonicalize;
use crate::contraction::Contraction;
use crate::error::{ContractionError, Result};
use crate::export::read_export;
use crate::notation::{to_json, to_sequant, to_tex, Term};
use crate::symmetry::find_symmetrizations;

/// The notation to translate into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// `R^{v_2 v_1}_{o_1 o_2} += ...`, one line per contraction.
    #[default]
    Tex,
    /// Grouped terms with explicit antisymmetrizers.
    Sequant,
    /// Contractions and symmetrizations as JSON.
    Json,
}

/// Options of [`translate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    pub notation: Notation,
    /// Drop contractions that violate an invariant instead of failing.
    pub keep_going: bool,
}

/// Translates the text of an export into the requested notation.
///
/// Contractions are translated in input order. With
/// [`TranslateOptions::keep_going`] set, a contraction that fails to
/// canonicalize or symmetrize is logged and skipped; parse errors always abort.
///
/// # Examples
/// ```
/// # use gecco_notation::translate::{translate, TranslateOptions};
/// let output = translate("[END]", &TranslateOptions::default()).unwrap();
/// assert!(output.is_empty());
/// ```
pub fn translate(text: &str, options: &TranslateOptions) -> Result<String> {
    let records = read_export(text)?;
    let total = records.len();

    let contractions = records
        .iter()
        .filter_map(|record| keep_or_skip(canonicalize(record), options).transpose())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let output = match options.notation {
        Notation::Tex => to_tex(&contractions),
        Notation::Sequant => to_sequant(&terms(contractions, options)?),
        Notation::Json => to_json(&terms(contractions, options)?)?,
    };

    info!(total, notation:? = options.notation; "Translated export");
    Ok(output)
}

fn terms(
    contractions: Vec<Contraction>,
    options: &TranslateOptions,
) -> std::result::Result<Vec<Term>, ContractionError> {
    contractions
        .into_iter()
        .filter_map(|contraction| {
            let symmetrization = find_symmetrizations(&contraction);
            keep_or_skip(symmetrization, options)
                .map(|symmetrization| symmetrization.map(|s| Term::new(contraction, s)))
                .transpose()
        })
        .collect()
}

/// Turns a failure into `Ok(None)` if the options allow skipping it.
fn keep_or_skip<T>(
    outcome: std::result::Result<T, ContractionError>,
    options: &TranslateOptions,
) -> std::result::Result<Option<T>, ContractionError> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(err) if options.keep_going => {
            warn!(contraction = err.contraction; "Skipping contraction: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
