//! Qualifier rendering: structured qualifiers to a readable phrase
//!
//! Best-effort natural-language synthesis. The output reads well for
//! the common causal qualifier combinations; unusual combinations may
//! come out clumsy. That is a known limitation, not a contract to
//! produce perfect English.

use super::types::Qualifier;

const QUALIFIED_PREDICATE: &str = "qualified_predicate";
const ASPECT_QUALIFIER: &str = "aspect_qualifier";
const DIRECTION_QUALIFIER: &str = "direction_qualifier";

/// Clean a predicate or qualifier value for display: strip the
/// category namespace, turn underscores into spaces, collapse runs of
/// whitespace.
pub fn clean_term(term: &str) -> String {
    let stripped = term.strip_prefix("biolink:").unwrap_or(term);
    stripped
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn find_value<'a>(qualifiers: &'a [Qualifier], suffix: &str) -> Option<&'a str> {
    qualifiers
        .iter()
        .find(|q| {
            q.qualifier_type_id
                .strip_prefix("biolink:")
                .unwrap_or(&q.qualifier_type_id)
                .ends_with(suffix)
        })
        .map(|q| q.qualifier_value.as_str())
}

/// Render one relation's qualifier set into a phrase.
///
/// A causal qualified predicate composes
/// `<subject> <direction-or-predicate> <aspect> of <object>`; the
/// inverse ("caused by" style) composes the passive construction; a
/// relation with no qualified predicate falls back to
/// `<subject> <predicate> <object>`.
pub fn render_phrase(
    subject: &str,
    predicate: &str,
    object: &str,
    qualifiers: &[Qualifier],
) -> String {
    let qualified = find_value(qualifiers, QUALIFIED_PREDICATE).map(clean_term);
    let aspect = find_value(qualifiers, ASPECT_QUALIFIER).map(clean_term);
    let direction = find_value(qualifiers, DIRECTION_QUALIFIER).map(clean_term);

    let phrase = match qualified {
        Some(qp) if qp.ends_with("caused by") => {
            // Inverted causal predicate: subject is the effect.
            match aspect {
                Some(aspect) => format!(
                    "{} {} of {} caused by {}",
                    direction.unwrap_or_default(),
                    aspect,
                    subject,
                    object
                ),
                None => format!("{} caused by {}", subject, object),
            }
        }
        Some(qp) => {
            let verb = direction.as_deref().unwrap_or(&qp);
            match aspect {
                Some(aspect) => format!("{} {} {} of {}", subject, verb, aspect, object),
                None => format!("{} {} {}", subject, verb, object),
            }
        }
        None => format!("{} {} {}", subject, clean_term(predicate), object),
    };

    // Empty qualifier slots leave doubled spaces behind.
    clean_term(&phrase)
}
