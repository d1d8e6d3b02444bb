//! End-to-end pipeline tests: payload → records → index → queries → graphs

use scip_index::{
    Analyses, CallGraph, CallNode, DependencyGraph, Document, IndexBuilder, Occurrence, Position,
    Range, RawRecordSet, SymbolInformation, SymbolKind, SymbolQuery, SymbolRoles,
};

fn def(symbol: &str, range: Range) -> Occurrence {
    Occurrence::new(symbol, range, SymbolRoles::definition())
}

fn reference(symbol: &str, range: Range) -> Occurrence {
    Occurrence::new(symbol, range, SymbolRoles::new())
}

fn import(symbol: &str, range: Range) -> Occurrence {
    Occurrence::new(symbol, range, SymbolRoles::import())
}

fn function(id: &str, name: &str) -> SymbolInformation {
    SymbolInformation::new(id, name, SymbolKind::Function)
}

#[test]
fn call_graph_across_documents() {
    // a.py defines f() calling g(); b.py defines g()
    let a = Document::new("a.py", "python")
        .with_symbols(vec![function("sym:f", "f")])
        .with_occurrences(vec![
            def("sym:f", Range::new(0, 0, 4, 0)),
            reference("sym:g", Range::new(2, 4, 2, 5)),
        ]);
    let b = Document::new("b.py", "python")
        .with_symbols(vec![function("sym:g", "g")])
        .with_occurrences(vec![def("sym:g", Range::new(0, 0, 2, 0))]);

    let index = IndexBuilder::build(RawRecordSet::new(vec![a, b]));
    let graph = CallGraph::build(&index);

    let f = CallNode::symbol("sym:f");
    let g = CallNode::symbol("sym:g");

    assert_eq!(graph.edge_weight(&f, &g), Some(1));
    assert_eq!(graph.edge_weight(&g, &f), None);
    assert_eq!(graph.callers(&f), vec![]);
    assert_eq!(graph.callees(&g), vec![]);
}

#[test]
fn self_reference_produces_self_loop() {
    let doc = Document::new("rec.py", "python")
        .with_symbols(vec![function("sym:loop", "loop")])
        .with_occurrences(vec![
            def("sym:loop", Range::new(0, 0, 6, 0)),
            reference("sym:loop", Range::new(3, 4, 3, 8)),
        ]);

    let index = IndexBuilder::build(RawRecordSet::new(vec![doc]));
    let graph = CallGraph::build(&index);

    let node = CallNode::symbol("sym:loop");
    assert!(graph.edge_weight(&node, &node).unwrap() >= 1);
    assert!(graph.has_cycles());
}

#[test]
fn dependency_cycle_is_reported_not_dropped() {
    let a = Document::new("a.py", "python")
        .with_symbols(vec![function("sym:a", "a")])
        .with_occurrences(vec![import("sym:b", Range::new(0, 0, 0, 8))]);
    let b = Document::new("b.py", "python")
        .with_symbols(vec![function("sym:b", "b")])
        .with_occurrences(vec![import("sym:a", Range::new(0, 0, 0, 8))]);

    let index = IndexBuilder::build(RawRecordSet::new(vec![a, b]));
    let graph = DependencyGraph::build(&index);

    assert_eq!(graph.edge_count(), 2);
    assert!(graph.has_cycles());

    let err = graph.topological_order().unwrap_err();
    assert_eq!(err.cycles.len(), 1);
    assert_eq!(err.cycles[0].len(), 2);
}

#[test]
fn containment_resolves_nested_definition_at_its_start() {
    let doc = Document::new("nest.py", "python")
        .with_symbols(vec![function("sym:outer", "outer"), function("sym:inner", "inner")])
        .with_occurrences(vec![
            def("sym:outer", Range::new(0, 0, 20, 0)),
            def("sym:inner", Range::new(5, 4, 10, 0)),
        ]);

    let index = IndexBuilder::build(RawRecordSet::new(vec![doc]));
    let containment = index.containment("nest.py").unwrap();

    let hit = containment.enclosing_at(Position::new(5, 4)).unwrap();
    assert_eq!(hit.symbol, "sym:inner");
}

#[test]
fn statistics_scenario() {
    let make_doc = |path: &str, language: &str, functions: usize, classes: usize| {
        let mut symbols = Vec::new();
        for i in 0..functions {
            symbols.push(function(&format!("sym:{path}:f{i}"), "f"));
        }
        for i in 0..classes {
            symbols.push(SymbolInformation::new(
                format!("sym:{path}:c{i}"),
                "C",
                SymbolKind::Class,
            ));
        }
        Document::new(path, language).with_symbols(symbols)
    };

    let index = IndexBuilder::build(RawRecordSet::new(vec![
        make_doc("a.py", "python", 4, 1),
        make_doc("b.py", "python", 2, 1),
        make_doc("c.go", "go", 1, 1),
    ]));

    let stats = index.get_statistics();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.total_symbols, 10);
    assert_eq!(stats.kind_distribution["Function"], 7);
    assert_eq!(stats.kind_distribution["Class"], 3);
    assert_eq!(stats.language_distribution.len(), 2);
}

#[test]
fn json_payload_to_graphs() {
    let payload = br#"{
        "documents": [
            {
                "relative_path": "app.py",
                "language": "python",
                "occurrences": [
                    {"symbol": "s m p 1 app/main().", "range": [0, 4, 6, 0], "symbol_roles": 1},
                    {"symbol": "s m p 1 util/run().", "range": [2, 4, 2, 7]},
                    {"symbol": "s m p 1 util/run().", "range": [0, 0, 0, 10], "symbol_roles": 2}
                ],
                "symbols": [
                    {"symbol": "s m p 1 app/main().", "display_name": "main", "kind": "Function"}
                ]
            },
            {
                "relative_path": "util.py",
                "language": "python",
                "occurrences": [
                    {"symbol": "s m p 1 util/run().", "range": [0, 4, 3, 0], "symbol_roles": 1}
                ],
                "symbols": [
                    {"symbol": "s m p 1 util/run().", "display_name": "run", "kind": "Function"}
                ]
            }
        ]
    }"#;

    let records = RawRecordSet::from_json_slice(payload).unwrap();
    let analyses = Analyses::new(IndexBuilder::build(records));

    // Call graph: main -> run, once (the import occurrence is not a call)
    let calls = analyses.call_graph();
    assert_eq!(
        calls.edge_weight(
            &CallNode::symbol("s m p 1 app/main()."),
            &CallNode::symbol("s m p 1 util/run().")
        ),
        Some(1)
    );

    // Dependency graph: app.py -> util.py via the import occurrence
    let deps = analyses.dependency_graph();
    assert_eq!(deps.dependencies("app.py"), vec!["util.py"]);
    assert_eq!(deps.topological_order().unwrap(), vec!["util.py", "app.py"]);

    // Query surface
    let functions = analyses.query().by_kind(SymbolKind::Function).execute();
    assert_eq!(functions.len(), 2);
    assert_eq!(functions[0].document, "app.py");
}

#[test]
fn empty_index_short_circuits_everything() {
    let index = IndexBuilder::build(RawRecordSet::default());

    assert!(SymbolQuery::new(&index).execute().is_empty());
    assert_eq!(CallGraph::build(&index).node_count(), 0);
    assert_eq!(DependencyGraph::build(&index).node_count(), 0);
    assert_eq!(index.get_statistics().total_symbols, 0);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    const LANGUAGES: [&str; 3] = ["python", "go", "typescript"];
    const KINDS: [SymbolKind; 4] = [
        SymbolKind::Function,
        SymbolKind::Class,
        SymbolKind::Variable,
        SymbolKind::Interface,
    ];

    /// Small record sets with possible duplicate symbol ids across documents
    fn arb_records() -> impl Strategy<Value = RawRecordSet> {
        let arb_symbol = (0u8..12, 0usize..KINDS.len())
            .prop_map(|(id, kind)| (format!("sym:{id}"), KINDS[kind]));

        let arb_document = (
            0usize..LANGUAGES.len(),
            proptest::collection::vec(arb_symbol, 0..5),
        );

        proptest::collection::vec(arb_document, 0..4).prop_map(|docs| {
            let documents = docs
                .into_iter()
                .enumerate()
                .map(|(i, (lang, symbols))| {
                    let occurrences = symbols
                        .iter()
                        .enumerate()
                        .map(|(j, (id, _))| {
                            let line = (j as u32) * 10;
                            def(id, Range::new(line, 0, line + 5, 0))
                        })
                        .collect();
                    let symbols = symbols
                        .into_iter()
                        .map(|(id, kind)| SymbolInformation::new(id.clone(), id, kind))
                        .collect();
                    Document::new(format!("doc{i}.py"), LANGUAGES[lang])
                        .with_symbols(symbols)
                        .with_occurrences(occurrences)
                })
                .collect();
            RawRecordSet::new(documents)
        })
    }

    proptest! {
        #[test]
        fn build_is_idempotent(records in arb_records()) {
            let first = IndexBuilder::build(records.clone());
            let second = IndexBuilder::build(records);

            prop_assert_eq!(first.symbol_order(), second.symbol_order());
            prop_assert_eq!(first.get_statistics(), second.get_statistics());

            for kind in KINDS {
                for language in LANGUAGES {
                    let a = SymbolQuery::new(&first)
                        .by_kind(kind)
                        .by_language(language)
                        .execute();
                    let b = SymbolQuery::new(&second)
                        .by_kind(kind)
                        .by_language(language)
                        .execute();
                    prop_assert_eq!(a, b);
                }
            }
        }

        #[test]
        fn filters_commute(records in arb_records(), kind_idx in 0usize..KINDS.len(), lang_idx in 0usize..LANGUAGES.len()) {
            let index = IndexBuilder::build(records);
            let kind = KINDS[kind_idx];
            let language = LANGUAGES[lang_idx];

            let a = SymbolQuery::new(&index)
                .by_kind(kind)
                .by_language(language)
                .execute();
            let b = SymbolQuery::new(&index)
                .by_language(language)
                .by_kind(kind)
                .execute();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn definition_occurrences_are_retrievable(records in arb_records()) {
            let expected: Vec<(String, Range)> = records
                .documents
                .iter()
                .flat_map(|doc| {
                    doc.occurrences
                        .iter()
                        .filter(|occ| occ.is_definition())
                        .map(|occ| (occ.symbol.clone(), occ.range))
                })
                .collect();

            let index = IndexBuilder::build(records);

            for (symbol, range) in expected {
                let occurrences = index.occurrences(&symbol);
                prop_assert!(!occurrences.is_empty());
                prop_assert!(occurrences
                    .iter()
                    .any(|(_, occ)| occ.is_definition() && occ.range == range));
            }
        }

        #[test]
        fn execute_matches_filtered_full_scan(records in arb_records(), kind_idx in 0usize..KINDS.len()) {
            let index = IndexBuilder::build(records);
            let kind = KINDS[kind_idx];

            let all = SymbolQuery::new(&index).execute();
            let filtered = SymbolQuery::new(&index).by_kind(kind).execute();

            let expected: Vec<_> = all
                .into_iter()
                .filter(|record| record.kind == kind.code())
                .collect();
            prop_assert_eq!(filtered, expected);
        }
    }
}
