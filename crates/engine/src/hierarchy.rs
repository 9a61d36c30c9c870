//! Rebuilds the two-level category tree from flat records.

use std::collections::HashMap;

use crate::categories::{Category, CategoryNode};

/// Attaches every subcategory to the category named by its `parent_id`.
///
/// Subcategories keep their input order inside each node. Subcategories whose
/// parent is not among the categories are dropped. Top-level nodes are sorted
/// by `created_at`, newest first; the sort is stable so ties keep input order.
pub fn build(records: Vec<Category>) -> Vec<CategoryNode> {
    let (categories, subcategories): (Vec<_>, Vec<_>) =
        records.into_iter().partition(Category::is_category);

    let mut children: HashMap<String, Vec<Category>> = HashMap::new();
    for sub in subcategories {
        if let Some(parent_id) = sub.parent_id.clone() {
            children.entry(parent_id).or_default().push(sub);
        }
    }

    let mut nodes: Vec<CategoryNode> = categories
        .into_iter()
        .map(|category| CategoryNode {
            subcategories: children.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect();

    nodes.sort_by(|a, b| b.category.created_at.cmp(&a.category.created_at));
    nodes
}
