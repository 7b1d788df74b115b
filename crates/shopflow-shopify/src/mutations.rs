//! Textual builders for the Admin GraphQL request bodies.
//!
//! All free-text values (title, description, tags, SKUs, option names,
//! media URLs) pass through [`escape`] before interpolation. Numeric and
//! enum-like fields (price, status, media content type) are interpolated
//! unescaped and must come only from values already constrained to safe
//! character sets: the two-digit decimal strings produced by the variant
//! expander, [`ProductStatus::as_str`], and
//! [`MediaContentType::as_str`].

use shopflow_core::media::ResolvedMedia;
use shopflow_core::product::Product;
use shopflow_core::variants::Expansion;

use crate::types::SubscriptionPlan;

/// Escapes a free-text value for interpolation inside a double-quoted
/// GraphQL string literal.
///
/// Backslashes are doubled first, then quotes are escaped. The order
/// matters: escaping quotes first would double-escape the backslashes
/// inserted for them.
#[must_use]
pub fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

fn quoted(raw: &str) -> String {
    format!("\"{}\"", escape(raw))
}

fn quoted_list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| quoted(s)).collect();
    format!("[{}]", inner.join(", "))
}

/// Builds the `productCreate` mutation for one canonical product and its
/// expanded variant matrix.
#[must_use]
pub fn product_create_mutation(product: &Product, expansion: &Expansion, tags: &[String]) -> String {
    let mut input = vec![
        format!("title: {}", quoted(&product.title)),
        format!("status: {}", product.status().as_str()),
        format!("tags: {}", quoted_list(tags)),
    ];

    if let Some(description) = &product.description {
        input.insert(1, format!("descriptionHtml: {}", quoted(description)));
    }

    if !expansion.options.is_empty() {
        input.push(format!("options: {}", quoted_list(&expansion.options)));
    }

    let variants: Vec<String> = expansion
        .variants
        .iter()
        .map(|variant| {
            let mut fields = Vec::new();
            if !variant.options.is_empty() {
                fields.push(format!("options: {}", quoted_list(&variant.options)));
            }
            fields.push(format!("price: \"{}\"", variant.price));
            if let Some(sku) = &variant.sku {
                fields.push(format!("sku: {}", quoted(sku)));
            }
            format!("{{{}}}", fields.join(", "))
        })
        .collect();
    input.push(format!("variants: [{}]", variants.join(", ")));

    format!(
        "mutation {{ productCreate(input: {{{input}}}) {{ \
         product {{ id title status tags \
         variants(first: 100) {{ edges {{ node {{ id title price sku }} }} }} }} \
         userErrors {{ field message }} }} }}",
        input = input.join(", ")
    )
}

/// Builds the `productCreateMedia` mutation attaching `media` to the
/// created product. Returns `None` when there is nothing to attach — the
/// media call is skipped entirely in that case.
#[must_use]
pub fn product_media_mutation(product_id: &str, media: &[ResolvedMedia]) -> Option<String> {
    if media.is_empty() {
        return None;
    }

    let entries: Vec<String> = media
        .iter()
        .map(|m| {
            format!(
                "{{originalSource: {}, mediaContentType: {}}}",
                quoted(&m.url),
                m.content_type.as_str()
            )
        })
        .collect();

    Some(format!(
        "mutation {{ productCreateMedia(productId: {id}, media: [{media}]) {{ \
         media {{ id status }} \
         mediaUserErrors {{ field message }} }} }}",
        id = quoted(product_id),
        media = entries.join(", ")
    ))
}

/// Read-only query for the most recent `first` orders.
#[must_use]
pub fn orders_query(first: usize) -> String {
    format!(
        "query {{ orders(first: {first}, reverse: true) {{ edges {{ node {{ \
         id name createdAt displayFulfillmentStatus \
         totalPriceSet {{ shopMoney {{ amount }} }} }} }} }} }}"
    )
}

/// Read-only query for a single order by admin GID.
#[must_use]
pub fn order_query(order_id: &str) -> String {
    format!(
        "query {{ order(id: {id}) {{ \
         id name createdAt displayFulfillmentStatus \
         totalPriceSet {{ shopMoney {{ amount }} }} }} }}",
        id = quoted(order_id)
    )
}

/// Builds the `appSubscriptionCreate` mutation. Pass-through: no branching
/// beyond the `test` flag.
#[must_use]
pub fn subscription_create_mutation(plan: &SubscriptionPlan) -> String {
    format!(
        "mutation {{ appSubscriptionCreate(name: {name}, returnUrl: {url}, test: {test}, \
         lineItems: [{{plan: {{appRecurringPricingDetails: \
         {{price: {{amount: {amount}, currencyCode: USD}}}}}}}}]) {{ \
         confirmationUrl appSubscription {{ id status }} \
         userErrors {{ field message }} }} }}",
        name = quoted(&plan.name),
        url = quoted(&plan.return_url),
        test = plan.test,
        amount = quoted(&plan.price)
    )
}

#[cfg(test)]
mod tests {
    use shopflow_core::media::{MediaContentType, ResolvedMedia};
    use shopflow_core::product::{AttrValue, Attribute, Product};
    use shopflow_core::variants::expand;

    use super::*;

    // -----------------------------------------------------------------------
    // escape — the one audited function
    // -----------------------------------------------------------------------

    #[test]
    fn escape_doubles_backslashes() {
        assert_eq!(escape(r"a\b"), r"a\\b");
    }

    #[test]
    fn escape_escapes_double_quotes() {
        assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
    }

    #[test]
    fn escape_backslash_before_quote_is_not_double_escaped() {
        // Backslash first, then quote: \" becomes \\\" (escaped backslash,
        // then escaped quote) — never \\\\" or \\\".
        assert_eq!(escape(r#"\""#), r#"\\\""#);
    }

    #[test]
    fn escape_empty_string_is_empty() {
        assert_eq!(escape(""), "");
    }

    #[test]
    fn escape_plain_text_is_unchanged() {
        assert_eq!(escape("Enamel Mug 12oz"), "Enamel Mug 12oz");
    }

    #[test]
    fn escaped_title_forms_valid_quoted_literal() {
        let title = r#"The "Best\Ever" Mug"#;
        let literal = format!("\"{}\"", escape(title));
        // A valid literal: delimiters unescaped, every interior quote
        // preceded by an odd number of backslashes.
        let inner = &literal[1..literal.len() - 1];
        let mut backslashes = 0usize;
        for c in inner.chars() {
            match c {
                '\\' => backslashes += 1,
                '"' => {
                    assert!(backslashes % 2 == 1, "unescaped quote inside literal");
                    backslashes = 0;
                }
                _ => backslashes = 0,
            }
        }
        assert_eq!(backslashes % 2, 0, "dangling escape at end of literal");
    }

    // -----------------------------------------------------------------------
    // productCreate
    // -----------------------------------------------------------------------

    fn mug() -> Product {
        Product {
            title: "Enamel Mug".to_owned(),
            description: Some("<p>Camping mug.</p>".to_owned()),
            is_active: Some(true),
            attributes: vec![Attribute {
                name: "Color".to_owned(),
                values: vec![
                    AttrValue {
                        name: "Red".to_owned(),
                        price: Some("13.50".to_owned()),
                        sku: Some("MUG-R".to_owned()),
                        ..AttrValue::default()
                    },
                    AttrValue {
                        name: "Blue".to_owned(),
                        ..AttrValue::default()
                    },
                ],
            }],
            ..Product::default()
        }
    }

    #[test]
    fn product_create_interpolates_title_status_and_tags() {
        let product = mug();
        let expansion = expand(&product);
        let body = product_create_mutation(&product, &expansion, &["a".to_owned()]);
        assert!(body.contains("title: \"Enamel Mug\""));
        assert!(body.contains("status: ACTIVE"));
        assert!(body.contains("tags: [\"a\"]"));
        assert!(body.contains("options: [\"Color\"]"));
    }

    #[test]
    fn product_create_draft_status_when_inactive() {
        let mut product = mug();
        product.is_active = None;
        let expansion = expand(&product);
        let body = product_create_mutation(&product, &expansion, &[]);
        assert!(body.contains("status: DRAFT"));
    }

    #[test]
    fn product_create_lists_variants_in_expansion_order() {
        let product = mug();
        let expansion = expand(&product);
        let body = product_create_mutation(&product, &expansion, &[]);
        let red = body.find("options: [\"Red\"]").expect("Red variant");
        let blue = body.find("options: [\"Blue\"]").expect("Blue variant");
        assert!(red < blue);
        assert!(body.contains("price: \"13.50\""));
        assert!(body.contains("sku: \"MUG-R\""));
    }

    #[test]
    fn product_create_escapes_free_text_fields() {
        let mut product = mug();
        product.title = r#"Mug "special" \edition"#.to_owned();
        let expansion = expand(&product);
        let body = product_create_mutation(&product, &expansion, &[]);
        assert!(body.contains(r#"title: "Mug \"special\" \\edition""#));
    }

    #[test]
    fn product_create_omits_description_when_absent() {
        let mut product = mug();
        product.description = None;
        let expansion = expand(&product);
        let body = product_create_mutation(&product, &expansion, &[]);
        assert!(!body.contains("descriptionHtml"));
    }

    #[test]
    fn product_create_default_variant_has_no_options_key() {
        let product = Product {
            title: "Plain".to_owned(),
            price: Some("7.25".to_owned()),
            ..Product::default()
        };
        let expansion = expand(&product);
        let body = product_create_mutation(&product, &expansion, &[]);
        assert!(!body.contains("options:"));
        assert!(body.contains("variants: [{price: \"7.25\"}]"));
    }

    // -----------------------------------------------------------------------
    // productCreateMedia
    // -----------------------------------------------------------------------

    fn image(url: &str) -> ResolvedMedia {
        ResolvedMedia {
            content_type: MediaContentType::Image,
            url: url.to_owned(),
        }
    }

    #[test]
    fn media_mutation_absent_when_no_media() {
        assert_eq!(product_media_mutation("gid://shopify/Product/1", &[]), None);
    }

    #[test]
    fn media_mutation_lists_sources_in_order() {
        let body = product_media_mutation(
            "gid://shopify/Product/1",
            &[
                image("https://cdn.example.com/a.jpg"),
                image("https://cdn.example.com/b.jpg"),
            ],
        )
        .expect("media body");
        let a = body.find("a.jpg").expect("first image");
        let b = body.find("b.jpg").expect("second image");
        assert!(a < b);
        assert!(body.contains("mediaContentType: IMAGE"));
        assert!(body.contains("productId: \"gid://shopify/Product/1\""));
    }

    // -----------------------------------------------------------------------
    // Pass-through builders
    // -----------------------------------------------------------------------

    #[test]
    fn orders_query_interpolates_page_size() {
        let body = orders_query(25);
        assert!(body.contains("orders(first: 25"));
    }

    #[test]
    fn order_query_escapes_the_id() {
        let body = order_query("gid://shopify/Order/42");
        assert!(body.contains("order(id: \"gid://shopify/Order/42\")"));
    }

    #[test]
    fn subscription_mutation_carries_plan_fields() {
        let plan = SubscriptionPlan {
            name: "Pro".to_owned(),
            price: "9.99".to_owned(),
            return_url: "https://app.example.com/billing/done".to_owned(),
            test: true,
        };
        let body = subscription_create_mutation(&plan);
        assert!(body.contains("name: \"Pro\""));
        assert!(body.contains("amount: \"9.99\""));
        assert!(body.contains("test: true"));
    }
}
