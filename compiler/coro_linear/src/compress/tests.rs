use coro_flow::{Code, Node};
use pretty_assertions::assert_eq;

use super::{compress, fold_noops, remove_redundant_labels};
use crate::dump::dump;
use crate::ir::{Label, Statement, StatementKind};
use crate::linearize::linearize;

fn compressed(flow: &[Node]) -> String {
    dump(&compress(linearize(flow)))
}

fn l(n: u32) -> Label {
    Label::new(n)
}

fn noop(label: u32) -> Statement {
    Statement::labeled(l(label), StatementKind::Noop { comment: None })
}

#[test]
fn simple_if_else() {
    let flow = [
        Node::if_true_else(
            "CheckSomething()",
            vec![Node::command("DoSomething()")],
            vec![Node::command("DoSomethingElse()")],
        ),
        Node::command("Finalize()"),
    ];

    assert_eq!(
        compressed(&flow),
        " : if CheckSomething()
   is false, jump to 3
 : DoSomething()
 : jump 4
3: DoSomethingElse()
4: Finalize()"
    );
}

#[test]
fn simple_if_without_else() {
    let flow = [
        Node::if_true("CheckSomething()", vec![Node::command("DoSomething()")]),
        Node::command("Finalize()"),
    ];

    assert_eq!(
        compressed(&flow),
        " : if CheckSomething()
   is false, jump to 2
 : DoSomething()
2: Finalize()"
    );
}

#[test]
fn nested_if() {
    let flow = [
        Node::if_true_else(
            "CheckOuter()",
            vec![Node::if_true_else(
                "OuterTrue_CheckInner()",
                vec![Node::command("OuterTrue_DoInner()")],
                vec![Node::command("OuterTrue_DoElseInner()")],
            )],
            vec![Node::if_true_else(
                "OuterFalse_CheckInner()",
                vec![Node::command("OuterFalse_DoInner()")],
                vec![Node::command("OuterFalse_DoElseInner()")],
            )],
        ),
        Node::command("Finalize()"),
    ];

    assert_eq!(
        compressed(&flow),
        "  : if CheckOuter()
    is false, jump to 7
  : if OuterTrue_CheckInner()
    is false, jump to 4
  : OuterTrue_DoInner()
  : jump 5
 4: OuterTrue_DoElseInner()
 5: jump 11
 7: if OuterFalse_CheckInner()
    is false, jump to 10
  : OuterFalse_DoInner()
  : jump 11
10: OuterFalse_DoElseInner()
11: Finalize()"
    );
}

#[test]
fn trailing_noop_is_kept() {
    let flow = [Node::while_loop("HasNext()", vec![Node::Yield])];

    assert_eq!(
        compressed(&flow),
        "\
0: if HasNext()
   is false, jump to 3
 : yield
 : jump 0
3: noop"
    );
}

#[test]
fn trailing_noop_run_collapses_to_first() {
    let flow = [Node::if_true(
        "A()",
        vec![Node::if_true("B()", vec![Node::command("X()")])],
    )];

    assert_eq!(
        compressed(&flow),
        " : if A()
   is false, jump to 3
 : if B()
   is false, jump to 3
 : X()
3: noop"
    );
}

#[test]
fn redundant_labels_are_counted() {
    let mut statements = linearize(&[Node::command("a"), Node::Yield, Node::command("b")]);
    assert_eq!(remove_redundant_labels(&mut statements), 3);
    assert!(statements.iter().all(|s| s.label.is_none()));
}

#[test]
fn targeted_labels_survive() {
    let mut statements = vec![
        Statement::labeled(l(0), StatementKind::Jump { target: l(2) }),
        Statement::labeled(l(1), StatementKind::Yield),
        Statement::labeled(l(2), StatementKind::Yield),
    ];
    assert_eq!(remove_redundant_labels(&mut statements), 2);
    let labels: Vec<_> = statements.iter().map(|s| s.label).collect();
    assert_eq!(labels, vec![None, None, Some(l(2))]);
}

#[test]
fn unlabeled_noops_are_dropped() {
    let statements = vec![
        Statement::new(StatementKind::Noop {
            comment: Some(Code::new("nothing")),
        }),
        Statement::labeled(l(0), StatementKind::Yield),
        Statement::new(StatementKind::Noop { comment: None }),
    ];
    assert_eq!(
        fold_noops(statements),
        vec![Statement::labeled(l(0), StatementKind::Yield)]
    );
}

#[test]
fn labeled_statement_after_noops_keeps_its_label() {
    let statements = vec![
        Statement::new(StatementKind::Jump { target: l(5) }),
        Statement::new(StatementKind::Jump { target: l(6) }),
        noop(5),
        noop(6),
        Statement::labeled(l(7), StatementKind::Yield),
        Statement::new(StatementKind::Jump { target: l(7) }),
    ];

    assert_eq!(
        fold_noops(statements),
        vec![
            Statement::new(StatementKind::Jump { target: l(7) }),
            Statement::new(StatementKind::Jump { target: l(7) }),
            Statement::labeled(l(7), StatementKind::Yield),
            Statement::new(StatementKind::Jump { target: l(7) }),
        ]
    );
}

#[test]
fn unlabeled_statement_after_noops_adopts_first_label() {
    let statements = vec![
        Statement::new(StatementKind::If {
            condition: Code::new("c"),
            on_true: Some(l(4)),
            on_false: Some(l(3)),
        }),
        noop(3),
        noop(4),
        Statement::new(StatementKind::Yield),
    ];

    assert_eq!(
        fold_noops(statements),
        vec![
            Statement::new(StatementKind::If {
                condition: Code::new("c"),
                on_true: Some(l(3)),
                on_false: Some(l(3)),
            }),
            Statement::labeled(l(3), StatementKind::Yield),
        ]
    );
}

#[test]
fn trailing_run_keeps_comment_of_first_noop() {
    let statements = vec![
        Statement::new(StatementKind::Jump { target: l(9) }),
        Statement::labeled(
            l(8),
            StatementKind::Noop {
                comment: Some(Code::new("done")),
            },
        ),
        noop(9),
    ];

    assert_eq!(
        fold_noops(statements),
        vec![
            Statement::new(StatementKind::Jump { target: l(8) }),
            Statement::labeled(
                l(8),
                StatementKind::Noop {
                    comment: Some(Code::new("done")),
                },
            ),
        ]
    );
}
