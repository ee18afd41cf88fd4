//! Category display formatting

use crate::models::Category;

/// Format the registry as a tree of categories and their subcategories
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budget init' to create the default categories."
            .to_string();
    }

    let mut output = String::new();

    for (i, category) in categories.iter().enumerate() {
        output.push_str(&format!("{}\n", category.name));

        if category.subcategories.is_empty() {
            output.push_str("  (no subcategories)\n");
        } else {
            for (j, sub) in category.subcategories.iter().enumerate() {
                let is_last = j == category.subcategories.len() - 1;
                let prefix = if is_last { "└── " } else { "├── " };
                output.push_str(&format!("  {}{}\n", prefix, sub));
            }
        }

        if i < categories.len() - 1 {
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree() {
        let categories = vec![
            Category::with_subcategories("Food", ["Groceries", "Take Out"]),
            Category::new("Pets"),
        ];
        let output = format_category_tree(&categories);
        assert!(output.contains("  ├── Groceries\n"));
        assert!(output.contains("  └── Take Out\n"));
        assert!(output.contains("(no subcategories)"));
    }

    #[test]
    fn test_empty() {
        assert!(format_category_tree(&[]).contains("budget init"));
    }
}
