//! Rendering of field layouts into aligned YAML.

use super::{Field, FieldKind, Template};

const INDENT: &str = "  ";

struct Line {
    text: String,
    help: Option<String>,
}

/// Render the YAML template for `T`.
pub fn render<T: Template>() -> String {
    render_fields(&T::fields())
}

/// Render a field layout as YAML, with help comments aligned one column past
/// the longest line.
pub fn render_fields(fields: &[Field]) -> String {
    let mut lines = Vec::new();
    collect(fields, 0, &mut lines);

    let width = lines
        .iter()
        .map(|line| line.text.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for line in &lines {
        out.push_str(&line.text);
        if let Some(help) = &line.help {
            let pad = width - line.text.chars().count() + 1;
            out.extend(std::iter::repeat_n(' ', pad));
            out.push_str("# ");
            out.push_str(help);
        }
        out.push('\n');
    }
    out
}

fn collect(fields: &[Field], depth: usize, lines: &mut Vec<Line>) {
    let indent = INDENT.repeat(depth);

    for field in fields {
        let help = field.help.clone();
        match &field.kind {
            FieldKind::String => {
                let value = field.example().unwrap_or_default();
                lines.push(Line {
                    text: format!("{indent}{}: \"{}\"", field.name, escape(value)),
                    help,
                });
            }
            FieldKind::Scalar => {
                let value = field.example().unwrap_or("null");
                lines.push(Line {
                    text: format!("{indent}{}: {value}", field.name),
                    help,
                });
            }
            FieldKind::List => {
                lines.push(heading(&indent, field));
                let items = match field.examples() {
                    [] => vec!["example"],
                    items => items.iter().map(|item| item.trim()).collect(),
                };
                for item in items {
                    lines.push(Line {
                        text: format!("{indent}{INDENT}- {item}"),
                        help: None,
                    });
                }
            }
            FieldKind::Records(record) => {
                lines.push(heading(&indent, field));
                lines.push(Line {
                    text: format!("{indent}{INDENT}-"),
                    help: None,
                });
                collect(record, depth + 2, lines);
            }
            FieldKind::Map => {
                lines.push(heading(&indent, field));
                lines.push(Line {
                    text: format!("{indent}{INDENT}key: value"),
                    help: Some("Map example".to_string()),
                });
            }
            FieldKind::Section(children) => {
                lines.push(heading(&indent, field));
                collect(children, depth + 1, lines);
            }
        }
    }
}

fn heading(indent: &str, field: &Field) -> Line {
    Line {
        text: format!("{indent}{}:", field.name),
        help: field.help.clone(),
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Field {
    /// Defaults if any were given, otherwise the placeholder.
    fn examples(&self) -> &[String] {
        match (&self.defaults[..], &self.placeholder) {
            ([], Some(placeholder)) => std::slice::from_ref(placeholder),
            (defaults, _) => defaults,
        }
    }

    fn example(&self) -> Option<&str> {
        self.examples().first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct ServiceConfig;

    impl Template for ServiceConfig {
        fn fields() -> Vec<Field> {
            vec![
                Field::string("host").default("localhost").help("The hostname"),
                Field::scalar("port").default("8080").help("The port number"),
                Field::scalar("enabled").default("true").help("Enable the feature"),
                Field::list("options")
                    .defaults(["1", "2", "3"])
                    .help("List of options"),
                Field::section(
                    "meta",
                    vec![Field::string("version").default("1.0").help("App version")],
                ),
                Field::map("map_field").help("Example map field"),
            ]
        }
    }

    #[test]
    fn test_render_full_layout() {
        let expected = r#"host: "localhost" # The hostname
port: 8080        # The port number
enabled: true     # Enable the feature
options:          # List of options
  - 1
  - 2
  - 3
meta:
  version: "1.0"  # App version
map_field:        # Example map field
  key: value      # Map example
"#;
        assert_eq!(render::<ServiceConfig>(), expected);
    }

    #[test]
    fn test_render_without_help() {
        let fields = [
            Field::string("host").default("localhost"),
            Field::scalar("port").default("8080"),
        ];
        assert_eq!(render_fields(&fields), "host: \"localhost\"\nport: 8080\n");
    }

    #[test]
    fn test_empty_help_renders_no_comment() {
        let fields = [
            Field::scalar("port").default("8080").help(""),
            Field::map("labels").help(""),
        ];
        assert_eq!(
            render_fields(&fields),
            "port: 8080\nlabels:\n  key: value # Map example\n"
        );
    }

    #[test]
    fn test_render_scalar_lists() {
        let single = [Field::list("options").default("value1").help("Array of options")];
        assert_eq!(render_fields(&single), "options:   # Array of options\n  - value1\n");

        let empty = [Field::list("options").help("Array of options")];
        assert_eq!(render_fields(&empty), "options:    # Array of options\n  - example\n");

        let padded = [Field::list("hosts").defaults([" a ", "b"])];
        assert_eq!(render_fields(&padded), "hosts:\n  - a\n  - b\n");
    }

    #[test]
    fn test_render_records() {
        let fields = [Field::records(
            "items",
            vec![
                Field::string("name").default("item1").help("Item name"),
                Field::scalar("value"),
            ],
        )
        .help("Array of items")];

        let expected = r#"items:            # Array of items
  -
    name: "item1" # Item name
    value: null
"#;
        assert_eq!(render_fields(&fields), expected);
    }

    #[test]
    fn test_render_map() {
        let fields = [Field::map("settings").help("Map of settings")];
        assert_eq!(
            render_fields(&fields),
            "settings:    # Map of settings\n  key: value # Map example\n"
        );
    }

    #[test]
    fn test_placeholder_used_without_default() {
        let fields = [
            Field::string("username")
                .placeholder("your_username")
                .default("default_username")
                .help("User login name"),
            Field::string("nickname")
                .placeholder("your_username")
                .help("User nickname"),
        ];

        let expected = r#"username: "default_username" # User login name
nickname: "your_username"    # User nickname
"#;
        assert_eq!(render_fields(&fields), expected);
    }

    #[test]
    fn test_missing_string_default_and_escaping() {
        let fields = [
            Field::string("token"),
            Field::string("motd").default(r#"say "hi""#),
        ];
        assert_eq!(
            render_fields(&fields),
            "token: \"\"\nmotd: \"say \\\"hi\\\"\"\n"
        );
    }

    #[test]
    fn test_rendered_template_is_valid_yaml() {
        let rendered = render::<ServiceConfig>();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();

        assert_eq!(parsed["host"].as_str(), Some("localhost"));
        assert_eq!(parsed["port"].as_u64(), Some(8080));
        assert_eq!(parsed["enabled"].as_bool(), Some(true));
        assert_eq!(parsed["meta"]["version"].as_str(), Some("1.0"));
        assert_eq!(parsed["map_field"]["key"].as_str(), Some("value"));
        assert_eq!(parsed["options"].as_sequence().map(Vec::len), Some(3));
    }

    proptest! {
        #[test]
        fn prop_help_comments_share_a_column(
            entries in prop::collection::vec(("[a-z_]{1,12}", "[a-z0-9]{0,10}", "[A-Za-z ]{1,20}"), 1..8)
        ) {
            let fields: Vec<Field> = entries
                .iter()
                .map(|(name, value, help)| Field::scalar(name.as_str()).default(value.as_str()).help(help.as_str()))
                .collect();

            let rendered = render_fields(&fields);
            let columns: Vec<usize> = rendered
                .lines()
                .map(|line| line.find(" # ").map(|i| i + 1))
                .collect::<Option<Vec<_>>>()
                .unwrap();

            prop_assert_eq!(rendered.lines().count(), fields.len());
            prop_assert!(columns.windows(2).all(|w| w[0] == w[1]));
        }
    }
}
