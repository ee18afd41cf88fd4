//! Category CLI commands
//!
//! Implements CLI commands for the category and subcategory registry.

use clap::Subcommand;

use crate::context::AppContext;
use crate::display::category::format_category_tree;
use crate::error::BudgetResult;
use crate::services::CategoryService;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with their subcategories
    List,

    /// Add a category (a "<name> (General)" subcategory is created with it)
    Add {
        /// Category name
        name: String,
    },

    /// Add a subcategory to an existing category
    #[command(name = "add-sub")]
    AddSub {
        /// Category name
        category: String,
        /// Subcategory name
        subcategory: String,
    },

    /// Remove a subcategory that no expense uses
    #[command(name = "remove-sub")]
    RemoveSub {
        category: String,
        subcategory: String,
    },

    /// Remove a category that no expense uses
    Remove {
        /// Category name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(ctx: &AppContext, cmd: CategoryCommands) -> BudgetResult<()> {
    let service = CategoryService::new(&ctx.storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_tree(&categories));
        }

        CategoryCommands::Add { name } => {
            let category = service.add_category(&name)?;
            println!("Created category: {}", category.name);
            for sub in &category.subcategories {
                println!("  - {}", sub);
            }
        }

        CategoryCommands::AddSub {
            category,
            subcategory,
        } => {
            let updated = service.add_subcategory(&category, &subcategory)?;
            println!("Added subcategory '{}' to {}", subcategory.trim(), updated.name);
        }

        CategoryCommands::RemoveSub {
            category,
            subcategory,
        } => match service.remove_subcategory(&category, &subcategory)? {
            Some(updated) => {
                println!("Removed subcategory '{}' from {}", subcategory.trim(), updated.name);
            }
            None => {
                println!(
                    "Removed subcategory '{}'; category '{}' had no subcategories left and was removed",
                    subcategory.trim(),
                    category.trim()
                );
            }
        },

        CategoryCommands::Remove { name } => {
            let removed = service.remove_category(&name)?;
            println!("Removed category: {}", removed.name);
        }
    }

    Ok(())
}
