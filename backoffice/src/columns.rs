//! Column sets of the back-office tables.

use datagrid::{CellValue, ColumnDescriptor};

use crate::model::{LinkedEntity, ProductRow, RecipeRow, UserRow};

fn amount(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "-".to_string(),
    }
}

fn names(entities: &[LinkedEntity]) -> CellValue {
    CellValue::List(entities.iter().map(|e| CellValue::from(&e.name)).collect())
}

fn joined_names(entities: &[LinkedEntity], locale: &str, empty: &str) -> String {
    let names: Vec<&str> = entities
        .iter()
        .map(|e| e.name.resolve(locale))
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        empty.to_string()
    } else {
        names.join(", ")
    }
}

/// Row key of every table: the record id.
pub fn product_key(row: &ProductRow) -> String {
    row.id.clone()
}

pub fn user_key(row: &UserRow) -> String {
    row.id.clone()
}

pub fn recipe_key(row: &RecipeRow) -> String {
    row.id.clone()
}

/// Columns of the products table.
///
/// `locale` drives the brand sort, which compares lowercased brand names as
/// displayed.
pub fn product_columns(locale: &str) -> Vec<ColumnDescriptor<ProductRow>> {
    let brand_locale = locale.to_string();

    vec![
        ColumnDescriptor::new("image")
            .header("")
            .cell(|p: &ProductRow, _| match p.default_image() {
                Some(_) => "[img]".to_string(),
                None => "[ ]".to_string(),
            })
            .size(60)
            .fixed_width()
            .pinned()
            .not_filterable(),
        ColumnDescriptor::new("name")
            .header("Name")
            .accessor(|p: &ProductRow| CellValue::from(&p.name))
            .size(200),
        ColumnDescriptor::new("brand")
            .header("Brand")
            .accessor(|p: &ProductRow| names(&p.brands))
            .cell(|p: &ProductRow, ctx| joined_names(&p.brands, ctx.locale, "No Brand"))
            .sort_with(move |a: &ProductRow, b: &ProductRow| {
                a.brand_sort_key(&brand_locale)
                    .cmp(&b.brand_sort_key(&brand_locale))
            })
            .size(150),
        ColumnDescriptor::new("kcal")
            .header("Kcal")
            .accessor(|p: &ProductRow| CellValue::from(p.kcal))
            .cell(|p: &ProductRow, _| amount(p.kcal, " kcal"))
            .size(100),
        ColumnDescriptor::new("protein")
            .header("Protein")
            .accessor(|p: &ProductRow| CellValue::from(p.protein))
            .cell(|p: &ProductRow, _| amount(p.protein, "g"))
            .size(80),
        ColumnDescriptor::new("carbs")
            .header("Carbs")
            .accessor(|p: &ProductRow| CellValue::from(p.carbs))
            .cell(|p: &ProductRow, _| amount(p.carbs, "g"))
            .size(80),
        ColumnDescriptor::new("fat")
            .header("Fat")
            .accessor(|p: &ProductRow| CellValue::from(p.fat))
            .cell(|p: &ProductRow, _| amount(p.fat, "g"))
            .size(80),
        ColumnDescriptor::new("tags")
            .header("Tags")
            .accessor(|p: &ProductRow| names(&p.tags))
            .cell(|p: &ProductRow, ctx| joined_names(&p.tags, ctx.locale, "None"))
            .sort_with(|a: &ProductRow, b: &ProductRow| a.tags.len().cmp(&b.tags.len()))
            .size(150),
        ColumnDescriptor::new("is_public")
            .header("Status")
            .accessor(|p: &ProductRow| CellValue::from(if p.is_public { "Public" } else { "Private" }))
            .size(100),
        ColumnDescriptor::new("actions")
            .header("")
            .cell(|_: &ProductRow, _| "...".to_string())
            .size(50)
            .fixed_width()
            .pinned()
            .not_sortable()
            .not_filterable(),
    ]
}

/// Columns of the users table.
pub fn user_columns() -> Vec<ColumnDescriptor<UserRow>> {
    vec![
        ColumnDescriptor::new("user")
            .header("User")
            .accessor(|u: &UserRow| {
                CellValue::List(vec![
                    CellValue::from(u.title()),
                    CellValue::from(u.email.as_str()),
                ])
            })
            .cell(|u: &UserRow, _| format!("{} <{}>", u.title(), u.email))
            .sort_with(|a: &UserRow, b: &UserRow| {
                a.title().to_lowercase().cmp(&b.title().to_lowercase())
            })
            .size(300)
            .pinned(),
        ColumnDescriptor::new("role")
            .header("Role")
            .accessor(|u: &UserRow| CellValue::from(u.role.as_str()))
            .size(100),
        ColumnDescriptor::new("goal")
            .header("Goal")
            .accessor(|u: &UserRow| CellValue::from(u.goal()))
            .size(150),
        ColumnDescriptor::new("status")
            .header("Status")
            .accessor(|u: &UserRow| CellValue::from(u.status()))
            .size(120),
        ColumnDescriptor::new("actions")
            .header("Actions")
            .cell(|_: &UserRow, _| "...".to_string())
            .size(80)
            .fixed_width()
            .pinned()
            .not_sortable()
            .not_filterable(),
    ]
}

/// Columns of the recipes table.
pub fn recipe_columns() -> Vec<ColumnDescriptor<RecipeRow>> {
    vec![
        ColumnDescriptor::new("name")
            .header("Recipe Name")
            .accessor(|r: &RecipeRow| CellValue::from(&r.name))
            .size(300)
            .pinned(),
        ColumnDescriptor::new("cook_time")
            .header("Cook Time (m)")
            .accessor(|r: &RecipeRow| CellValue::from(r.cook_time))
            .size(120),
        ColumnDescriptor::new("categories")
            .header("Categories")
            .accessor(|r: &RecipeRow| {
                CellValue::List(r.meal_types.iter().map(|t| CellValue::from(t.as_str())).collect())
            })
            .size(200),
        ColumnDescriptor::new("satiety")
            .header("Satiety")
            .accessor(|r: &RecipeRow| CellValue::from(r.satiety))
            .size(100),
        ColumnDescriptor::new("actions")
            .header("Actions")
            .cell(|_: &RecipeRow, _| "...".to_string())
            .size(80)
            .fixed_width()
            .pinned()
            .not_sortable()
            .not_filterable(),
    ]
}

#[cfg(test)]
mod tests {
    use datagrid::validate_columns;

    use super::*;

    #[test]
    fn test_column_sets_are_valid() {
        assert_eq!(validate_columns(&product_columns("en")), Ok(()));
        assert_eq!(validate_columns(&user_columns()), Ok(()));
        assert_eq!(validate_columns(&recipe_columns()), Ok(()));
    }

    #[test]
    fn test_product_sizes() {
        let sizes: Vec<(String, u32)> = product_columns("en")
            .into_iter()
            .map(|c| (c.id.clone(), c.size))
            .collect();
        let expected = [
            ("image", 60),
            ("name", 200),
            ("brand", 150),
            ("kcal", 100),
            ("protein", 80),
            ("carbs", 80),
            ("fat", 80),
            ("tags", 150),
            ("is_public", 100),
            ("actions", 50),
        ];
        assert_eq!(sizes.len(), expected.len());
        for ((id, size), (want_id, want_size)) in sizes.iter().zip(expected) {
            assert_eq!((id.as_str(), *size), (want_id, want_size));
        }
    }

    #[test]
    fn test_menu_labels() {
        let labels: Vec<String> = product_columns("en")
            .iter()
            .filter(|c| c.hideable)
            .map(|c| c.menu_title())
            .collect();
        assert_eq!(
            labels,
            ["name", "brand", "kcal", "protein", "carbs", "fat", "tags", "is public"]
        );
    }
}
