//! The `new --list` template catalog listing

use crate::templates::TemplateDescriptor;
use colored::Colorize;

pub(crate) fn render(templates: &[TemplateDescriptor], interactive: bool, supports_emoji: bool) -> String {
    let bullet = if supports_emoji { "‣" } else { "-" };
    let mut out = Vec::with_capacity(templates.len() * 2);

    for template in templates {
        let id = if interactive {
            template.id.cyan().to_string()
        } else {
            template.id.clone()
        };
        out.push(format!("{} {} ({})", bullet, template.name, id));
        if !template.description.is_empty() {
            let description = if interactive {
                template.description.dimmed().to_string()
            } else {
                template.description.clone()
            };
            out.push(format!("  {}", description));
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    fn catalog() -> Vec<TemplateDescriptor> {
        vec![
            TemplateDescriptor {
                id: "blank".to_string(),
                name: "Blank".to_string(),
                description: "An empty function".to_string(),
            },
            TemplateDescriptor {
                id: "hello-world".to_string(),
                name: "Hello World".to_string(),
                description: String::new(),
            },
        ]
    }

    #[test]
    fn test_plain_list() {
        let out = render(&catalog(), false, true);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "‣ Blank (blank)",
                "  An empty function",
                "‣ Hello World (hello-world)",
            ]
        );
    }

    #[test]
    fn test_interactive_list_matches_plain_text() {
        let out = render(&catalog(), true, false);
        assert_eq!(
            strip_ansi_codes(&out),
            "- Blank (blank)\n  An empty function\n- Hello World (hello-world)"
        );
    }
}
