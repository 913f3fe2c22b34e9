//! `{{name}}` placeholder substitution for template text

/// Replace every `{{key}}` with its value; unknown placeholders are left untouched
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_known_placeholders() {
        let out = render(
            "export class {{ pascalName }}Service {} // {{camelName}}",
            &[("pascalName", "User"), ("camelName", "user")],
        );
        assert_eq!(out, "export class UserService {} // user");
    }

    #[test]
    fn test_unknown_and_unterminated_placeholders_are_kept() {
        assert_eq!(render("a {{other}} b", &[("x", "1")]), "a {{other}} b");
        assert_eq!(render("style={{ open", &[("open", "1")]), "style={{ open");
    }

    #[test]
    fn test_text_without_placeholders_is_verbatim() {
        let text = "const x = { a: { b: 1 } };\n";
        assert_eq!(render(text, &[("a", "z")]), text);
    }
}
