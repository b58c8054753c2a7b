//! Integration tests for the shopping list export pipeline.
//!
//! These tests run aggregation, layout and PDF encoding together against
//! in-memory carts.

#![allow(clippy::unwrap_used)]

use foodgram_core::{CartLine, UserId};
use foodgram_integration_tests::{FixtureCart, drawn_text};
use foodgram_server::services::shopping_list::{
    FontSource, LayoutText, LineStyle, Page, PageCapacity, RenderOptions, ShoppingListError,
    aggregate, export, lay_out,
};

const COOK: UserId = UserId::new(1);
const GUEST: UserId = UserId::new(2);

fn page_texts(page: &Page) -> Vec<String> {
    page.lines().iter().map(|l| l.text.clone()).collect()
}

/// Two recipes sharing flour: [Flour 200 g, Egg 2 pcs] and [Flour 100 g, Milk 250 ml].
fn pancake_cart() -> FixtureCart {
    FixtureCart::new()
        .with_recipe(COOK, &[("Flour", "g", 200), ("Egg", "pcs", 2)])
        .with_recipe(COOK, &[("Flour", "g", 100), ("Milk", "ml", 250)])
}

fn numbered(rows: &[String]) -> Vec<&String> {
    rows.iter()
        .filter(|t| t.split_once(". ").is_some_and(|(n, _)| n.parse::<usize>().is_ok()))
        .collect()
}

// =============================================================================
// Aggregation
// =============================================================================

#[tokio::test]
async fn test_flour_egg_milk_scenario() {
    let cart = pancake_cart();

    // Cart order, then ingredient name within each recipe.
    let lines = aggregate(&cart, COOK).await.unwrap();
    assert_eq!(
        lines,
        vec![
            CartLine::new("Egg", "pcs", 2),
            CartLine::new("Flour", "g", 300),
            CartLine::new("Milk", "ml", 250),
        ]
    );

    let pages = lay_out(&lines, PageCapacity::default(), &LayoutText::default());
    assert_eq!(pages.len(), 1);
    assert_eq!(
        page_texts(&pages[0]),
        vec![
            "Shopping list:",
            "1. Egg - 2 pcs.",
            "2. Flour - 300 g.",
            "3. Milk - 250 ml.",
        ]
    );
}

#[tokio::test]
async fn test_exported_document_holds_grouped_totals() {
    let export = export(&pancake_cart(), COOK, RenderOptions::default())
        .await
        .unwrap();

    let drawn = drawn_text(&export.bytes);
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0][0], "Shopping list:");
    assert_eq!(
        numbered(&drawn[0]),
        vec!["1. Egg - 2 pcs.", "2. Flour - 300 g.", "3. Milk - 250 ml."]
    );
}

#[tokio::test]
async fn test_totals_across_recipes() {
    let cart = FixtureCart::new()
        .with_recipe(COOK, &[("Flour", "g", 200), ("Sugar", "g", 50)])
        .with_recipe(COOK, &[("Butter", "g", 100), ("Flour", "g", 150)])
        .with_recipe(COOK, &[("Sugar", "tbsp", 2)]);

    let lines = aggregate(&cart, COOK).await.unwrap();

    assert_eq!(
        lines,
        vec![
            CartLine::new("Flour", "g", 350),
            CartLine::new("Sugar", "g", 50),
            CartLine::new("Butter", "g", 100),
            CartLine::new("Sugar", "tbsp", 2),
        ]
    );

    let raw_total: i64 = cart
        .raw_lines(COOK)
        .iter()
        .map(|l| i64::from(l.amount))
        .sum();
    let grouped_total: u64 = lines.iter().map(|l| l.amount).sum();
    assert_eq!(u64::try_from(raw_total).unwrap(), grouped_total);
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let cart = FixtureCart::new()
        .with_recipe(COOK, &[("Rice", "g", 500)])
        .with_recipe(GUEST, &[("Beans", "g", 400)]);

    let lines = aggregate(&cart, GUEST).await.unwrap();
    assert_eq!(lines, vec![CartLine::new("Beans", "g", 400)]);
}

#[tokio::test]
async fn test_aggregate_twice_is_stable() {
    let cart = FixtureCart::new()
        .with_recipe(COOK, &[("Oil", "ml", 30), ("Salt", "g", 5)])
        .with_recipe(COOK, &[("Salt", "g", 3)]);

    let first = aggregate(&cart, COOK).await.unwrap();
    let second = aggregate(&cart, COOK).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_malformed_line_fails_whole_export() {
    let cart = FixtureCart::new()
        .with_recipe(COOK, &[("Flour", "g", 300)])
        .with_recipe(COOK, &[("Water", "ml", 0)]);

    let err = export(&cart, COOK, RenderOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ShoppingListError::InvalidState(_)));
}

// =============================================================================
// Layout and Rendering
// =============================================================================

#[tokio::test]
async fn test_empty_cart_exports_notice_page() {
    let cart = FixtureCart::new();

    let lines = aggregate(&cart, COOK).await.unwrap();
    assert!(lines.is_empty());

    let pages = lay_out(&lines, PageCapacity::default(), &LayoutText::default());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].lines().len(), 1);
    assert_eq!(pages[0].lines()[0].style, LineStyle::Notice);
    assert_eq!(pages[0].item_count(), 0);

    let export = export(&cart, COOK, RenderOptions::default()).await.unwrap();
    let drawn = drawn_text(&export.bytes);
    assert_eq!(drawn, vec![vec!["Your shopping list is empty.".to_owned()]]);
    assert!(numbered(&drawn[0]).is_empty());
}

#[tokio::test]
async fn test_long_list_spans_pages() {
    let rows: Vec<(String, i32)> = (1..=25).map(|i| (format!("Spice {i:02}"), i)).collect();
    let borrowed: Vec<(&str, &str, i32)> = rows
        .iter()
        .map(|(name, amount)| (name.as_str(), "g", *amount))
        .collect();
    let cart = FixtureCart::new().with_recipe(COOK, &borrowed);

    let capacity = PageCapacity::new(10).unwrap();
    let lines = aggregate(&cart, COOK).await.unwrap();
    let pages = lay_out(&lines, capacity, &LayoutText::default());

    assert!(pages.len() > 1);
    assert!(pages.iter().all(|p| p.lines().len() <= capacity.get()));
    assert_eq!(pages.iter().map(Page::item_count).sum::<usize>(), 25);

    let options = RenderOptions {
        page_capacity: capacity,
        ..RenderOptions::default()
    };
    let export = export(&cart, COOK, options).await.unwrap();
    assert_eq!(export.filename, "shopping_cart.pdf");
    assert_eq!(export.content_type, "application/pdf");

    let drawn = drawn_text(&export.bytes);
    assert_eq!(drawn.len(), pages.len());
    assert!(drawn.iter().all(|page| page.len() <= capacity.get()));
    let items: Vec<&String> = drawn.iter().flat_map(|page| numbered(page)).collect();
    assert_eq!(items.len(), 25);
    assert_eq!(items[0], "1. Spice 01 - 1 g.");
    assert_eq!(items[24], "25. Spice 25 - 25 g.");
}

#[tokio::test]
async fn test_long_ingredient_name_wraps_on_one_page() {
    let long_name = "Freshly ground black pepper from Tellicherry ".repeat(4);
    let long_name = long_name.trim_end();
    let cart = FixtureCart::new().with_recipe(COOK, &[("Bay leaf", "pcs", 2), (long_name, "g", 4)]);

    let export = export(&cart, COOK, RenderOptions::default()).await.unwrap();
    let drawn = drawn_text(&export.bytes);

    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0][1], "1. Bay leaf - 2 pcs.");
    assert!(drawn[0].len() > 3);
    assert_eq!(drawn[0][2..].join(" "), format!("2. {long_name} - 4 g."));
}

#[tokio::test]
async fn test_missing_font_is_resource_unavailable() {
    let cart = FixtureCart::new().with_recipe(COOK, &[("Flour", "g", 300)]);
    let options = RenderOptions {
        font: FontSource::File("/nonexistent/fonts/Roboto-Regular.ttf".into()),
        ..RenderOptions::default()
    };

    let err = export(&cart, COOK, options).await.unwrap_err();
    assert!(matches!(err, ShoppingListError::ResourceUnavailable(_)));
}

#[tokio::test]
async fn test_builtin_font_refuses_cyrillic() {
    let cart = FixtureCart::new().with_recipe(COOK, &[("Flour", "g", 300), ("Мука", "г", 300)]);

    let err = export(&cart, COOK, RenderOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ShoppingListError::ResourceUnavailable(_)));
}
