//! Display-type resolution for heterogeneous category tags
//!
//! Sources disagree on how they categorize entities: the literature
//! connector emits bare tags ("Gene"), the knowledge-graph connectors
//! emit namespaced ones ("biolink:Gene"), and most records carry several
//! tags at once. Resolution is a fixed lookup table plus one priority
//! pass — never a cascade of ad hoc branches.

/// Category namespace stripped when falling back to a raw tag.
const CATEGORY_NAMESPACE: &str = "biolink:";

/// A row in the display-type table.
struct TypeRow {
    /// Tag as it appears in payloads, without namespace
    tag: &'static str,
    /// What the UI shows
    display: &'static str,
    /// Lower wins
    priority: u8,
}

/// Fixed priority order. Genes beat proteins beat diseases beat
/// chemicals beat pathways; everything else falls through to the
/// first raw tag.
const TYPE_TABLE: &[TypeRow] = &[
    TypeRow { tag: "Gene", display: "Gene", priority: 0 },
    TypeRow { tag: "Protein", display: "Protein", priority: 1 },
    TypeRow { tag: "Disease", display: "Disease", priority: 2 },
    TypeRow { tag: "PhenotypicFeature", display: "Phenotype", priority: 3 },
    TypeRow { tag: "Drug", display: "Drug", priority: 4 },
    TypeRow { tag: "SmallMolecule", display: "Drug", priority: 5 },
    TypeRow { tag: "ChemicalEntity", display: "Chemical", priority: 6 },
    TypeRow { tag: "Pathway", display: "Pathway", priority: 7 },
];

fn strip_namespace(tag: &str) -> &str {
    tag.strip_prefix(CATEGORY_NAMESPACE).unwrap_or(tag)
}

/// Resolve an ordered category tag list to a single display type.
///
/// The highest-priority known tag wins regardless of its position in
/// the input. When no tag is known, the first tag is used verbatim with
/// its namespace prefix stripped. Empty input resolves to "Entity".
pub fn resolve_display_type(categories: &[String]) -> String {
    let mut best: Option<&TypeRow> = None;
    for raw in categories {
        let tag = strip_namespace(raw);
        if let Some(row) = TYPE_TABLE.iter().find(|r| r.tag == tag) {
            if best.map_or(true, |b| row.priority < b.priority) {
                best = Some(row);
            }
        }
    }
    if let Some(row) = best {
        return row.display.to_string();
    }
    categories
        .first()
        .map(|raw| strip_namespace(raw).to_string())
        .unwrap_or_else(|| "Entity".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn gene_outranks_disease() {
        let resolved = resolve_display_type(&tags(&["biolink:Disease", "biolink:Gene"]));
        assert_eq!(resolved, "Gene");
    }

    #[test]
    fn priority_ignores_tag_order() {
        let forward = resolve_display_type(&tags(&["biolink:Protein", "biolink:Pathway"]));
        let reverse = resolve_display_type(&tags(&["biolink:Pathway", "biolink:Protein"]));
        assert_eq!(forward, "Protein");
        assert_eq!(forward, reverse);
    }

    #[test]
    fn small_molecule_displays_as_drug() {
        assert_eq!(resolve_display_type(&tags(&["biolink:SmallMolecule"])), "Drug");
    }

    #[test]
    fn bare_tags_resolve_like_namespaced_ones() {
        assert_eq!(resolve_display_type(&tags(&["Disease"])), "Disease");
    }

    #[test]
    fn unknown_tag_falls_back_to_first_stripped() {
        let resolved = resolve_display_type(&tags(&["biolink:CellLine", "biolink:Whatever"]));
        assert_eq!(resolved, "CellLine");
    }

    #[test]
    fn empty_categories_resolve_to_entity() {
        assert_eq!(resolve_display_type(&[]), "Entity");
    }
}
