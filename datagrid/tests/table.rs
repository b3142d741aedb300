//! Behaviour of the table controller: filter, sort, paginate, columns and
//! selection.

use std::sync::{Arc, Mutex};

use datagrid::prelude::*;
use datagrid::{ColumnConfigError, validate_columns};

#[derive(Debug, Clone, PartialEq)]
struct Food {
    id: String,
    name: Vec<(&'static str, &'static str)>,
    kcal: Option<i64>,
}

fn food(id: &str, name: Vec<(&'static str, &'static str)>, kcal: Option<i64>) -> Food {
    Food {
        id: id.to_string(),
        name,
        kcal,
    }
}

fn columns() -> Vec<ColumnDescriptor<Food>> {
    vec![
        ColumnDescriptor::new("name")
            .header("Name")
            .accessor(|f: &Food| CellValue::localized(f.name.iter().copied()))
            .pinned(),
        ColumnDescriptor::new("kcal")
            .header("Calories")
            .accessor(|f: &Food| CellValue::from(f.kcal))
            .cell(|_, ctx| format!("{} kcal", ctx.value.display(ctx.locale)))
            .size(100),
        ColumnDescriptor::new("actions").not_sortable().fixed_width().pinned().size(50),
    ]
}

fn table(rows: Vec<Food>) -> Table<Food> {
    Table::builder(columns(), |f: &Food| f.id.clone())
        .data(rows)
        .enable_row_selection(true)
        .build()
}

fn numbered(count: usize) -> Vec<Food> {
    (0..count)
        .map(|i| food(&format!("r{}", i), vec![("en", "Item")], Some(i as i64)))
        .collect()
}

fn ids(rows: &[Food]) -> Vec<String> {
    rows.iter().map(|f| f.id.clone()).collect()
}

// -----------------------------------------------------------------------------
// Filter
// -----------------------------------------------------------------------------

#[test]
fn test_filter_requires_every_term() {
    let table = table(vec![
        food("r1", vec![("en", "Chicken Breast")], Some(165)),
        food("r2", vec![("en", "Beef Steak")], Some(271)),
    ]);

    table.set_global_filter("chi bre");
    assert_eq!(ids(&table.filtered_rows()), ["r1"]);

    table.set_global_filter("beef chicken");
    assert!(table.filtered_rows().is_empty());
}

#[test]
fn test_filter_matches_any_locale_variant() {
    let table = table(vec![
        food("apple", vec![("en", "Apple"), ("es", "Manzana")], Some(52)),
        food("pear", vec![("en", "Pear"), ("es", "Pera")], Some(57)),
    ]);
    assert_eq!(table.display_locale(), "en");

    table.set_global_filter("manz");
    assert_eq!(ids(&table.filtered_rows()), ["apple"]);
}

#[test]
fn test_blank_filter_keeps_data_order() {
    let rows = vec![
        food("b", vec![("en", "Banana")], Some(89)),
        food("a", vec![("en", "Apple")], Some(52)),
        food("c", vec![("en", "Cherry")], None),
    ];
    let table = table(rows.clone());

    for query in ["", "   ", "\t\n"] {
        table.set_global_filter(query);
        assert_eq!(table.filtered_rows(), rows);
    }
}

#[test]
fn test_numbers_match_unformatted() {
    let table = table(vec![
        food("big", vec![("en", "Lard")], Some(9020)),
        food("small", vec![("en", "Celery")], Some(16)),
    ]);

    table.set_global_filter("9020");
    assert_eq!(ids(&table.filtered_rows()), ["big"]);
    table.set_global_filter("9,020");
    assert!(table.filtered_rows().is_empty());
}

#[test]
fn test_single_character_query_filters() {
    let table = table(vec![
        food("r1", vec![("en", "Oat")], Some(389)),
        food("r2", vec![("en", "Rice")], Some(130)),
    ]);
    table.set_global_filter("o");
    assert_eq!(ids(&table.filtered_rows()), ["r1"]);
}

#[test]
fn test_filter_change_notifies_caller() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .on_global_filter_change(move |q| log.lock().unwrap().push(q.to_string()))
        .build();

    assert!(table.set_global_filter("egg"));
    assert!(!table.set_global_filter("egg"));
    assert_eq!(*seen.lock().unwrap(), ["egg"]);
}

// -----------------------------------------------------------------------------
// Sort
// -----------------------------------------------------------------------------

#[test]
fn test_descending_is_exact_reverse() {
    let table = table(vec![
        food("b", vec![("en", "Banana")], Some(89)),
        food("a", vec![("en", "Apple")], Some(52)),
        food("d", vec![("en", "Date")], Some(282)),
        food("c", vec![("en", "Cherry")], Some(63)),
    ]);

    table.toggle_sorting("kcal");
    let asc = ids(&table.filtered_rows());
    assert_eq!(asc, ["a", "c", "b", "d"]);

    table.toggle_sorting("kcal");
    let mut desc = ids(&table.filtered_rows());
    desc.reverse();
    assert_eq!(desc, asc);

    table.toggle_sorting("kcal");
    assert!(table.state().sorting.is_empty());
    assert_eq!(ids(&table.filtered_rows()), ["b", "a", "d", "c"]);
}

#[test]
fn test_nulls_sort_last() {
    let table = table(vec![
        food("none", vec![("en", "Water")], None),
        food("high", vec![("en", "Oil")], Some(884)),
        food("low", vec![("en", "Lettuce")], Some(15)),
    ]);

    table.set_sorting("kcal", SortAction::Asc);
    assert_eq!(ids(&table.filtered_rows()), ["low", "high", "none"]);
    table.set_sorting("kcal", SortAction::Desc);
    assert_eq!(ids(&table.filtered_rows()), ["high", "low", "none"]);
}

#[test]
fn test_localized_sort_uses_display_locale() {
    let rows = vec![
        food("apple", vec![("en", "Apple"), ("es", "Manzana")], None),
        food("pear", vec![("en", "Pear"), ("es", "Pera")], None),
        food("grape", vec![("en", "Grape"), ("es", "Uva")], None),
    ];
    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .data(rows)
        .display_locale("es")
        .build();

    table.set_sorting("name", SortAction::Asc);
    assert_eq!(ids(&table.filtered_rows()), ["apple", "pear", "grape"]);
}

#[test]
fn test_unsortable_column_is_ignored() {
    let table = table(numbered(3));
    assert!(!table.toggle_sorting("actions"));
    assert!(!table.toggle_sorting("missing"));
    assert!(table.state().sorting.is_empty());
}

// -----------------------------------------------------------------------------
// Pagination
// -----------------------------------------------------------------------------

#[test]
fn test_page_index_clamps_to_last_page() {
    let table = table(numbered(25));
    assert_eq!(table.page_count(), 3);

    table.set_page_index(5);
    assert_eq!(table.pagination().page_index, 2);
    assert_eq!(table.page_rows().len(), 5);
}

#[test]
fn test_navigation_stops_at_boundaries() {
    let table = table(numbered(25));
    assert!(!table.previous_page());
    assert!(table.next_page());
    assert!(table.next_page());
    assert!(!table.next_page());
    assert_eq!(table.pagination().page_index, 2);

    assert!(table.first_page());
    assert!(table.last_page());
    assert_eq!(ids(&table.page_rows())[0], "r20");
}

#[test]
fn test_page_size_change_clamps_index() {
    let table = table(numbered(25));
    table.set_page_index(2);
    table.set_page_size(30);
    let pagination = table.pagination();
    assert_eq!(pagination.page_size, 30);
    assert_eq!(pagination.page_index, 0);
    assert_eq!(table.page_count(), 1);
}

#[test]
fn test_filter_clamps_page() {
    let table = table(numbered(25));
    table.set_page_index(2);
    // kcal values containing a 1: 1, 10..=19, 21
    table.set_global_filter("1");
    assert_eq!(table.filtered_count(), 12);
    assert_eq!(table.pagination().page_index, 1);
}

#[test]
fn test_empty_table_has_one_page() {
    let table = table(Vec::new());
    assert_eq!(table.page_count(), 1);
    assert!(!table.next_page());
}

// -----------------------------------------------------------------------------
// Columns
// -----------------------------------------------------------------------------

#[test]
fn test_pinned_column_cannot_be_hidden() {
    let table = table(numbered(1));
    assert!(!table.set_column_visibility("name", false));
    assert!(!table.state().column_visibility.contains_key("name"));
    assert!(table.is_column_visible("name"));

    assert!(table.set_column_visibility("kcal", false));
    assert_eq!(table.visible_column_ids(), ["name", "actions"]);
}

#[test]
fn test_column_width_is_clamped() {
    let table = table(numbered(1));
    table.set_column_sizing("kcal", 10);
    assert_eq!(table.column_width("kcal"), Some(40));

    // Fixed-width columns ignore resize requests.
    assert!(!table.set_column_sizing("actions", 300));
    assert_eq!(table.column_width("actions"), Some(50));
}

#[test]
fn test_resize_drag_follows_deltas() {
    let table = table(numbered(1));
    let handle = table.begin_resize("kcal").unwrap();
    assert_eq!(table.resizing_column().as_deref(), Some("kcal"));

    assert_eq!(handle.apply([10, 25, 60]), 160);
    assert_eq!(handle.drag(-500), 40);
    assert_eq!(handle.finish(), 40);
    assert_eq!(table.resizing_column(), None);

    assert!(table.begin_resize("actions").is_none());
}

#[test]
fn test_initial_preferences_seed_state() {
    let mut prefs = Preferences::default();
    prefs.column_visibility.insert("kcal".into(), false);
    prefs.column_sizing.insert("name".into(), 240);

    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .initial_preferences(prefs.clone())
        .build();

    assert_eq!(table.preferences(), prefs);
    assert!(!table.is_column_visible("kcal"));
    assert_eq!(table.column_width("name"), Some(240));
}

#[test]
fn test_invalid_columns_still_build() {
    let duplicated = vec![
        ColumnDescriptor::new("kcal").accessor(|f: &Food| CellValue::from(f.kcal)),
        ColumnDescriptor::new("kcal"),
    ];
    assert_eq!(
        validate_columns(&duplicated),
        Err(ColumnConfigError::DuplicateId("kcal".into()))
    );

    let table = Table::builder(duplicated, |f: &Food| f.id.clone())
        .data(numbered(2))
        .build();
    assert_eq!(table.view().rows.len(), 2);
}

// -----------------------------------------------------------------------------
// Selection
// -----------------------------------------------------------------------------

#[test]
fn test_selection_survives_filter_change() {
    let table = table(vec![
        food("r1", vec![("en", "Chicken")], Some(165)),
        food("r2", vec![("en", "Beef")], Some(271)),
    ]);

    table.toggle_row_selection("r1");
    table.set_global_filter("beef");
    assert_eq!(ids(&table.filtered_rows()), ["r2"]);
    assert!(table.is_selected("r1"));

    table.set_global_filter("");
    assert!(table.is_selected("r1"));
    assert_eq!(ids(&table.selected_rows()), ["r1"]);

    table.clear_selection();
    assert!(!table.is_selected("r1"));
}

#[test]
fn test_page_checkbox_covers_current_page_only() {
    let table = table(numbered(15));
    assert_eq!(table.page_check_state(), CheckState::Unchecked);

    table.toggle_row_selection("r3");
    assert_eq!(table.page_check_state(), CheckState::Indeterminate);

    table.toggle_page_selection();
    assert_eq!(table.page_check_state(), CheckState::Checked);
    assert_eq!(table.selected_count(), 10);
    assert!(!table.is_selected("r10"));

    table.next_page();
    assert_eq!(table.page_check_state(), CheckState::Unchecked);

    table.previous_page();
    table.toggle_page_selection();
    assert_eq!(table.selected_count(), 0);
}

#[test]
fn test_selection_callback_gets_rows_in_data_order() {
    let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .data(numbered(3))
        .enable_row_selection(true)
        .on_selected_rows_change(move |rows: &[Food]| log.lock().unwrap().push(ids(rows)))
        .build();

    table.toggle_row_selection("r2");
    table.toggle_row_selection("r0");
    table.clear_selection();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec!["r2".to_string()], vec!["r0".into(), "r2".into()], vec![]]
    );
}

#[test]
fn test_selection_disabled_ignores_toggles() {
    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .data(numbered(3))
        .build();
    assert!(!table.toggle_row_selection("r0"));
    assert!(table.view().select_all.is_none());
}

#[test]
fn test_stale_keys_do_not_count() {
    let table = table(numbered(3));
    table.toggle_row_selection("r0");
    table.toggle_row_selection("r1");

    table.set_data(numbered(3).into_iter().skip(1).collect());
    assert!(table.is_selected("r0"));
    assert_eq!(ids(&table.selected_rows()), ["r1"]);
}

#[test]
fn test_row_click_forwards_row() {
    let clicked = Arc::new(Mutex::new(None));
    let slot = clicked.clone();
    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .data(numbered(3))
        .on_row_click(move |f: &Food| *slot.lock().unwrap() = Some(f.id.clone()))
        .build();

    table.click_row("r1");
    assert_eq!(clicked.lock().unwrap().as_deref(), Some("r1"));
    table.click_row("missing");
    assert_eq!(clicked.lock().unwrap().as_deref(), Some("r1"));
}

// -----------------------------------------------------------------------------
// View
// -----------------------------------------------------------------------------

#[test]
fn test_empty_result_renders_placeholder_row() {
    let table = table(numbered(3));
    table.set_global_filter("nothing matches");

    let view = table.view();
    assert!(view.rows.is_empty());
    let empty = view.empty_state.unwrap();
    assert_eq!(empty.text, "No results found.");
    assert_eq!(empty.colspan, 3);
    assert_eq!(view.footer.text, "0 Total Items");
    assert_eq!(view.footer.page_label(), "Page 1 of 1");
}

#[test]
fn test_view_renders_visible_cells() {
    let table = table(vec![food("r1", vec![("en", "Oat"), ("es", "Avena")], Some(389))]);
    table.set_column_visibility("kcal", false);

    let view = table.view();
    let header_ids: Vec<&str> = view.headers.iter().map(|h| h.column_id.as_str()).collect();
    assert_eq!(header_ids, ["name", "actions"]);
    assert_eq!(view.rows[0].cells[0].text, "Oat");

    let menu: Vec<(&str, bool)> = view
        .column_menu
        .iter()
        .map(|c| (c.id.as_str(), c.visible))
        .collect();
    assert_eq!(menu, [("kcal", false)]);

    table.set_column_visibility("kcal", true);
    assert_eq!(table.view().rows[0].cells[1].text, "389 kcal");
}

#[test]
fn test_bulk_bar_tracks_selection() {
    let table = table(numbered(3));
    assert!(table.view().bulk_bar.is_none());

    table.toggle_row_selection("r0");
    table.toggle_row_selection("r2");
    let bar = table.view().bulk_bar.unwrap();
    assert_eq!(bar.count, 2);

    let delete = bar.actions.iter().find(|a| a.id == "delete").unwrap();
    assert_eq!(delete.variant, ActionVariant::Destructive);
    delete.invoke();
    assert_eq!(table.selected_count(), 0);
    assert!(table.view().bulk_bar.is_none());
}

#[test]
fn test_custom_bulk_actions_receive_selected_rows() {
    let exported = Arc::new(Mutex::new(Vec::new()));
    let sink = exported.clone();
    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .data(numbered(3))
        .enable_row_selection(true)
        .selection_actions(move |rows: &[Food], clear: &ClearSelection| {
            let sink = sink.clone();
            let ids = ids(rows);
            let clear = clear.clone();
            vec![BulkAction::new("publish", "Publish", move || {
                sink.lock().unwrap().extend(ids.clone());
                clear.clear();
            })]
        })
        .build();

    table.toggle_row_selection("r1");
    let bar = table.view().bulk_bar.unwrap();
    assert_eq!(bar.actions.len(), 1);
    bar.actions[0].invoke();

    assert_eq!(*exported.lock().unwrap(), ["r1"]);
    assert_eq!(table.selected_count(), 0);
}

#[test]
fn test_custom_empty_and_footer_text() {
    let table = Table::builder(columns(), |f: &Food| f.id.clone())
        .empty_state_text("No products yet.")
        .footer_text("Products")
        .build();
    let view = table.view();
    assert_eq!(view.empty_state.unwrap().text, "No products yet.");
    assert_eq!(view.footer.text, "Products");
}

// -----------------------------------------------------------------------------
// Dispatch and observers
// -----------------------------------------------------------------------------

#[test]
fn test_dispatch_returns_new_state() {
    let table = table(numbered(25));
    let state = table.dispatch(TableEvent::SetPageSize(20));
    assert_eq!(state.pagination.page_size, 20);

    let state = table.dispatch(TableEvent::Sort {
        column_id: "kcal".into(),
        action: SortAction::Desc,
    });
    assert_eq!(state.sorting[0].direction, SortDirection::Desc);
}

#[test]
fn test_observers_see_each_change() {
    let table = table(numbered(3));
    let count = Arc::new(Mutex::new(0));
    let counter = count.clone();
    let id = table.subscribe(move |_| *counter.lock().unwrap() += 1);

    table.toggle_sorting("kcal");
    table.toggle_sorting("actions");
    table.set_global_filter("r");
    assert_eq!(*count.lock().unwrap(), 2);
    assert!(table.take_dirty());
    assert!(!table.take_dirty());

    assert!(table.unsubscribe(id));
    table.toggle_sorting("kcal");
    assert_eq!(*count.lock().unwrap(), 2);
}

#[test]
fn test_instances_are_independent() {
    let a = table(numbered(3));
    let b = table(numbered(3));
    assert_ne!(a.id(), b.id());

    a.set_global_filter("chicken");
    a.toggle_row_selection("r0");
    assert_eq!(a.filtered_count(), 0);
    assert_eq!(b.filtered_count(), 3);
    assert!(!b.is_selected("r0"));
}
