use jsoutline::outline::verify_ranges;
use jsoutline::{outline_source, Language, OutlineNode, TokenKind};

fn outline(source: &str, language: Language) -> Vec<OutlineNode> {
    let nodes = outline_source(source, language).unwrap();
    verify_ranges(&nodes).unwrap();
    nodes
}

fn signatures(nodes: &[OutlineNode]) -> Vec<String> {
    nodes.iter().map(OutlineNode::signature).collect()
}

const TYPES_TS: &str = r#"type Foo = number;
export type Bar = Foo;
"#;

const CLASS_TS: &str = r#"export class Service {
  private count: number = 0;
  handler = (event: string): void => {};

  constructor(private readonly name: string) {}

  greet(who: string, times?: number): string {
    return who;
  }

  async load({ id }: { id: number }, ...rest: string[]): Promise<void> {}
}
"#;

#[test]
fn type_aliases() {
    let nodes = outline(TYPES_TS, Language::TypeScript);
    assert_eq!(signatures(&nodes), vec!["type Foo", "export type Bar"]);
    assert_eq!(nodes[1].start_position.line, 1);
    assert_eq!(nodes[1].start_position.column, 0);

    let last = nodes[1].tokenized_text.last().unwrap();
    assert_eq!(last.kind, TokenKind::Type);
    assert_eq!(last.value, "Bar");
}

#[test]
fn class_members_drop_type_annotations() {
    let nodes = outline(CLASS_TS, Language::TypeScript);
    assert_eq!(signatures(&nodes), vec!["export class Service"]);
    assert_eq!(
        signatures(&nodes[0].children),
        vec![
            "count=",
            "handler=(event)",
            "constructor(name)",
            "greet(who, times)",
            "load({id}, ...rest)",
        ]
    );
}

#[test]
fn typed_functions_and_variables() {
    let source = "export function parse(input: string, strict = false): Ast {}\nconst limit: number = 10;\n";
    let nodes = outline(source, Language::TypeScript);
    assert_eq!(signatures(&nodes), vec!["export function parse(input, strict)", "const limit"]);
}

#[test]
fn interfaces_and_enums_are_skipped() {
    let nodes = outline("interface A { x: number }\nenum E { One }\n", Language::TypeScript);
    assert!(nodes.is_empty());
}

#[test]
fn tsx_components() {
    let source = "export const App = ({ title }: Props) => <h1>{title}</h1>;\n";
    let nodes = outline(source, Language::Tsx);
    assert_eq!(signatures(&nodes), vec!["export function App({title})"]);
}
