use coro_flow::{Code, ForLoop, Node};
use coro_linear::Label;
use pretty_assertions::assert_eq;

use super::{CppBackend, CppConfig};
use crate::{render_state_machine, BranchArms, Resume, StateMachineBackend};

fn render(flow: &[Node]) -> String {
    render_state_machine(&CppBackend::default(), flow)
}

fn verify_optional_property(prop: &str) -> Node {
    Node::if_true(
        format!("instance_.{prop}.HasValue()"),
        vec![
            Node::command(format!(
                "\
verification = VerifyConstrainedPrimitive(instance_.{prop}.Value());
iterator_ = verification.Begin();
iterator_end_ = verification.End();"
            )),
            ForLoop::new(
                "iterator_ != iterator_end_",
                vec![Node::command("error_ = *iterator_;"), Node::Yield],
            )
            .with_iteration("++iterator_")
            .into(),
            Node::command(
                "\
iterator_.reset();
iterator_end_.reset();",
            ),
        ],
    )
}

// Whole flows

#[test]
fn empty_flow() {
    assert_eq!(render(&[]), "// Intentionally empty.");
}

#[test]
fn inspired_by_verificator() {
    let flow = [
        Node::if_false(
            "CheckInvariant0()",
            vec![Node::command("error_ = ErrorForInvariant0();"), Node::Yield],
        ),
        Node::if_false(
            "CheckInvariant1()",
            vec![Node::command("error_ = ErrorForInvariant1();"), Node::Yield],
        ),
        verify_optional_property("prop0"),
        verify_optional_property("prop1"),
        Node::command(
            "\
error_.Reset();
Finalize();",
        ),
    ];

    assert_eq!(
        render(&flow),
        r#"while (true) {
  switch (state_) {
    case 0: {
      if (CheckInvariant0()) {
        state_ = 1;
        continue;
      }

      error_ = ErrorForInvariant0();

      state_ = 1;
      return;
    }

    case 1: {
      if (CheckInvariant1()) {
        state_ = 2;
        continue;
      }

      error_ = ErrorForInvariant1();

      state_ = 2;
      return;
    }

    case 2: {
      if (!(instance_.prop0.HasValue())) {
        state_ = 6;
        continue;
      }

      verification = VerifyConstrainedPrimitive(instance_.prop0.Value());
      iterator_ = verification.Begin();
      iterator_end_ = verification.End();
    }

    case 3: {
      if (!(iterator_ != iterator_end_)) {
        state_ = 5;
        continue;
      }

      error_ = *iterator_;

      state_ = 4;
      return;
    }

    case 4: {
      ++iterator_

      state_ = 3;
      continue;
    }

    case 5: {
      iterator_.reset();
      iterator_end_.reset();
    }

    case 6: {
      if (!(instance_.prop1.HasValue())) {
        state_ = 10;
        continue;
      }

      verification = VerifyConstrainedPrimitive(instance_.prop1.Value());
      iterator_ = verification.Begin();
      iterator_end_ = verification.End();
    }

    case 7: {
      if (!(iterator_ != iterator_end_)) {
        state_ = 9;
        continue;
      }

      error_ = *iterator_;

      state_ = 8;
      return;
    }

    case 8: {
      ++iterator_

      state_ = 7;
      continue;
    }

    case 9: {
      iterator_.reset();
      iterator_end_.reset();
    }

    case 10: {
      error_.Reset();
      Finalize();

      // We invalidate the state since we reached the end of the routine.
      state_ = 11;
      return;
    }

    default:
      throw std::logic_error(
        common::Concat(
          "Invalid state_: ",
          std::to_string(state_)
        )
      );
  }
}"#
    );
}

#[test]
fn last_yield_invalidates_state() {
    assert_eq!(
        render(&[Node::command("Run();"), Node::Yield]),
        r#"while (true) {
  switch (state_) {
    case 0: {
      Run();

      state_ = 1;  // Invalidate state
      return;
    }

    default:
      throw std::logic_error(
        common::Concat(
          "Invalid state_: ",
          std::to_string(state_)
        )
      );
  }
}"#
    );
}

#[test]
fn flow_ending_in_loop_is_exhausted_after_join() {
    assert_eq!(
        render(&[Node::while_loop("HasNext()", vec![Node::Yield])]),
        r#"while (true) {
  switch (state_) {
    case 0: {
      if (!(HasNext())) {
        state_ = 2;
        continue;
      }

      state_ = 1;
      return;
    }

    case 1: {
      state_ = 0;
      continue;
    }

    case 2: {
      // Noop

      // We invalidate the state since we reached the end of the routine.
      state_ = 3;
      return;
    }

    default:
      throw std::logic_error(
        common::Concat(
          "Invalid state_: ",
          std::to_string(state_)
        )
      );
  }
}"#
    );
}

#[test]
fn custom_config() {
    let backend = CppBackend::new(
        CppConfig::default()
            .with_state_member("step")
            .with_indent("\t"),
    );
    assert_eq!(backend.config().state_member, "step");

    assert_eq!(
        render_state_machine(&backend, &[Node::Yield]),
        "while (true) {
\tswitch (step) {
\t\tcase 0: {
\t\t\tstep = 1;  // Invalidate state
\t\t\treturn;
\t\t}

\t\tdefault:
\t\t\tthrow std::logic_error(
\t\t\t\tcommon::Concat(
\t\t\t\t\t\"Invalid step: \",
\t\t\t\t\tstd::to_string(step)
\t\t\t\t)
\t\t\t);
\t}
}"
    );
}

// Fragments

#[test]
fn two_armed_branch() {
    let backend = CppBackend::default();
    assert_eq!(
        backend.branch(
            &Code::new("Ready()"),
            BranchArms::Both {
                on_true: Label::new(3),
                on_false: Label::new(5),
            },
        ),
        "\
if (Ready()) {
  state_ = 3;
} else {
  state_ = 5;
}
continue;"
    );
}

#[test]
fn long_condition_is_wrapped() {
    let backend = CppBackend::default();
    let condition = Code::new("first_rather_long_condition() && second_rather_long_one()");
    assert!(condition.len() > 50);

    assert_eq!(
        backend.branch(&condition, BranchArms::OnFalse(Label::new(2))),
        "\
if (
  !(first_rather_long_condition() && second_rather_long_one())
) {
  state_ = 2;
  continue;
}"
    );
}

#[test]
fn multiline_condition_is_wrapped() {
    let backend = CppBackend::new(CppConfig::default().with_wrap_width(200));

    assert_eq!(
        backend.branch(&Code::new("a()\n&& b()"), BranchArms::OnTrue(Label::new(1))),
        "\
if (
  a()
  && b()
) {
  state_ = 1;
  continue;
}"
    );
}

#[test]
fn wrap_width_is_configurable() {
    let backend = CppBackend::new(CppConfig::default().with_wrap_width(3));
    assert_eq!(
        backend.branch(&Code::new("ok()"), BranchArms::OnTrue(Label::new(0))),
        "\
if (
  ok()
) {
  state_ = 0;
  continue;
}"
    );
}

#[test]
fn suspension_and_jump() {
    let backend = CppBackend::default();
    assert_eq!(
        backend.suspend(Resume::Next(Label::new(4))),
        "state_ = 4;\nreturn;"
    );
    assert_eq!(
        backend.suspend(Resume::Exhausted(Label::new(9))),
        "state_ = 9;  // Invalidate state\nreturn;"
    );
    assert_eq!(backend.jump(Label::new(2)), "state_ = 2;\ncontinue;");
}

#[test]
fn noop_comments() {
    let backend = CppBackend::default();
    assert_eq!(backend.noop(None), "// Noop");
    assert_eq!(
        backend.noop(Some(&Code::new("join of\n\nboth arms"))),
        "// join of\n//\n// both arms"
    );
}
