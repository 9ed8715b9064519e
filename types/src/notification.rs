//! Notification text rendering.
//!
//! All player-facing restriction messages go through this module so the
//! placeholder syntax stays consistent between builtin and user templates.

/// Placeholder replaced with the object's display name.
pub const ITEM_PLACEHOLDER: &str = "{item}";

/// Render a notification template for an object.
///
/// - Every `{item}` is replaced with `item_name`
/// - An empty template renders to an empty string (no notification)
/// - Surrounding whitespace is trimmed
///
/// # Examples
/// ```
/// use restrictor_types::notification::render_template;
/// assert_eq!(render_template("You cannot equip {item}.", "Daedric Bow"), "You cannot equip Daedric Bow.");
/// assert_eq!(render_template("", "Daedric Bow"), "");
/// assert_eq!(render_template("  Too weak  ", "Iron Sword"), "Too weak");
/// ```
pub fn render_template(template: &str, item_name: &str) -> String {
    let trimmed = template.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.replace(ITEM_PLACEHOLDER, item_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_placeholders() {
        assert_eq!(
            render_template("{item}? No. Not {item}.", "Ebony Mail"),
            "Ebony Mail? No. Not Ebony Mail."
        );
    }

    #[test]
    fn test_whitespace_only_template_is_silent() {
        assert_eq!(render_template("   ", "Ebony Mail"), "");
    }

    #[test]
    fn test_unknown_placeholders_are_left_alone() {
        assert_eq!(render_template("{name} {item}", "Bow"), "{name} Bow");
    }
}
