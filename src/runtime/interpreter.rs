use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use thiserror::Error;

use crate::ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};

use super::builtin;
use super::env::Environment;
use super::value::{Function, Value};
use super::window::Window;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("not a function: {0}")]
    NotCallable(String),
    #[error("{name} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("type error: {0}")]
    TypeError(String),
    #[error("string interpolation: {0}")]
    Interpolation(String),
    #[error("BREAK outside of a loop")]
    BreakOutsideLoop,
    #[error("RETURN outside of a function")]
    ReturnOutsideFunction,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Why execution of a statement stopped early. `Break` and `Return` are
/// resolved by the nearest enclosing loop or call boundary; only `Error`
/// may reach the host.
enum Unwind {
    Error(RuntimeError),
    Break,
    Return(Value),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Unwind {
        Unwind::Error(error)
    }
}

pub struct Interpreter {
    pub(super) window: Box<dyn Window>,
    pub(super) out: Box<dyn Write>,
    env: Rc<Environment>,
}

impl Interpreter {
    pub fn new(window: Box<dyn Window>) -> Interpreter {
        Interpreter::with_output(window, Box::new(io::stdout()))
    }

    /// Routes `print` output somewhere other than stdout; tests hand a
    /// shared buffer in here.
    pub fn with_output(window: Box<dyn Window>, out: Box<dyn Write>) -> Interpreter {
        Interpreter {
            window,
            out,
            env: Environment::global(),
        }
    }

    /// Non-failing probe of the current scope chain.
    pub fn try_get_variable(&self, name: &str) -> Option<Value> {
        self.env.try_get(name)
    }

    /// Executes one top-level statement. A stray BREAK or RETURN has no
    /// loop or call left to resolve it and becomes a runtime error here.
    pub fn execute_statement(&mut self, statement: &Stmt) -> Result<(), RuntimeError> {
        self.execute(statement).map_err(|unwind| match unwind {
            Unwind::Break => RuntimeError::BreakOutsideLoop,
            Unwind::Return(_) => RuntimeError::ReturnOutsideFunction,
            Unwind::Error(error) => error,
        })
    }

    fn execute(&mut self, statement: &Stmt) -> Result<(), Unwind> {
        match &statement.kind {
            // A block shares its enclosing scope; only calls open a new one.
            StmtKind::Block(statements) => {
                for statement in statements {
                    self.execute(statement)?;
                }
                Ok(())
            }
            StmtKind::Assignment { name, value } => {
                let value = self.eval(value)?;
                self.env.set(name, value);
                Ok(())
            }
            StmtKind::If {
                condition,
                then,
                or_else,
            } => {
                let test = self.eval(condition)?;
                let Some(test) = test.as_bool() else {
                    return Err(
                        RuntimeError::TypeError("expected a boolean condition".to_string()).into(),
                    );
                };
                if test {
                    self.execute(then)
                } else if let Some(or_else) = or_else {
                    self.execute(or_else)
                } else {
                    Ok(())
                }
            }
            StmtKind::ForRange {
                name,
                start,
                end,
                body,
            } => {
                let start = self.eval(start)?;
                let end = self.eval(end)?;
                let (Some(start), Some(end)) = (start.as_number(), end.as_number()) else {
                    return Err(
                        RuntimeError::TypeError("expected numeric loop bounds".to_string()).into(),
                    );
                };
                // Inclusive bounds; the loop variable is rebound in the
                // current scope and keeps its final value afterwards.
                let mut i = start;
                while i <= end {
                    self.env.set(name, Value::Number(i));
                    self.execute(body)?;
                    i += 1.0;
                }
                Ok(())
            }
            StmtKind::While { condition, body } => loop {
                let test = self.eval(condition)?;
                let Some(test) = test.as_bool() else {
                    return Err(
                        RuntimeError::TypeError("expected a boolean condition".to_string()).into(),
                    );
                };
                if !test {
                    return Ok(());
                }
                match self.execute(body) {
                    // BREAK ends exactly this loop.
                    Err(Unwind::Break) => return Ok(()),
                    other => other?,
                }
            },
            StmtKind::Break => Err(Unwind::Break),
            StmtKind::FunctionDef {
                name,
                parameters,
                body,
            } => {
                let function = Function {
                    name: name.clone(),
                    parameters: parameters.clone(),
                    body: body.as_ref().clone(),
                    closure: self.env.clone(),
                };
                // A definition is just a binding, so redefinition overwrites.
                self.env.set(name, Value::Function(Rc::new(function)));
                Ok(())
            }
            StmtKind::Return(value) => {
                let value = self.eval(value)?;
                Err(Unwind::Return(value))
            }
            StmtKind::Expression(expr) => {
                self.eval(expr)?;
                Ok(())
            }
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, Unwind> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(n.into_inner())),
            ExprKind::Boolean(b) => Ok(Value::Bool(*b)),
            ExprKind::Str(raw) => {
                let text = self.interpolate(raw)?;
                Ok(Value::Str(Rc::from(text)))
            }
            ExprKind::Identifier(name) => Ok(self.env.get(name)?),
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                Ok(apply_unary(*op, &operand)?)
            }
            ExprKind::Binary { left, op, right } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                Ok(apply_binary(&lhs, *op, &rhs)?)
            }
            ExprKind::Call { name, arguments } => self.call(name, arguments),
        }
    }

    fn call(&mut self, name: &str, arguments: &[Expr]) -> Result<Value, Unwind> {
        // Builtins dispatch ahead of user definitions, and their arity is
        // checked before any argument is evaluated.
        if let Some(builtin) = builtin::find(name) {
            if let Some(arity) = builtin.arity {
                if arguments.len() != arity {
                    return Err(RuntimeError::ArityMismatch {
                        name: name.to_string(),
                        expected: arity,
                        actual: arguments.len(),
                    }
                    .into());
                }
            }
            let args = self.eval_arguments(arguments)?;
            return (builtin.call)(self, args).map_err(Unwind::from);
        }

        let value = self.env.get(name)?;
        let Value::Function(function) = value else {
            return Err(RuntimeError::NotCallable(name.to_string()).into());
        };
        let args = self.eval_arguments(arguments)?;
        self.call_function(&function, args).map_err(Unwind::from)
    }

    fn eval_arguments(&mut self, arguments: &[Expr]) -> Result<Vec<Value>, Unwind> {
        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.eval(argument)?);
        }
        Ok(args)
    }

    /// Runs a user function in a fresh scope parented at its closure, so
    /// free variables resolve lexically rather than through the caller.
    fn call_function(&mut self, function: &Function, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if args.len() != function.parameters.len() {
            return Err(RuntimeError::ArityMismatch {
                name: function.name.clone(),
                expected: function.parameters.len(),
                actual: args.len(),
            });
        }
        let scope = function.closure.open_scope();
        for (parameter, value) in function.parameters.iter().zip(args) {
            scope.set(parameter, value);
        }
        let saved = mem::replace(&mut self.env, scope);
        let result = self.execute(&function.body);
        self.env = saved;
        match result {
            // Falling off the end of the body yields null.
            Ok(()) => Ok(Value::Null),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Break) => Err(RuntimeError::BreakOutsideLoop),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    /// Expands `{name}` interpolations in a string literal. `{{` and `}}`
    /// produce literal braces; any other unpaired brace is malformed.
    fn interpolate(&self, raw: &str) -> Result<String, RuntimeError> {
        let chars: Vec<char> = raw.chars().collect();
        let mut text = String::with_capacity(raw.len());
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '{' if chars.get(i + 1) == Some(&'{') => {
                    text.push('{');
                    i += 2;
                }
                '{' => {
                    let Some(close) = chars[i + 1..].iter().position(|&c| c == '}') else {
                        return Err(RuntimeError::Interpolation("mismatched '{'".to_string()));
                    };
                    let name: String = chars[i + 1..i + 1 + close].iter().collect();
                    let name = name.trim();
                    let value = self.env.get(name)?;
                    let Some(value_text) = value.scalar_text() else {
                        return Err(RuntimeError::Interpolation(format!(
                            "variable '{}' is not a scalar",
                            name
                        )));
                    };
                    text.push_str(&value_text);
                    i += close + 2;
                }
                '}' if chars.get(i + 1) == Some(&'}') => {
                    text.push('}');
                    i += 2;
                }
                '}' => {
                    return Err(RuntimeError::Interpolation("mismatched '}'".to_string()));
                }
                ch => {
                    text.push(ch);
                    i += 1;
                }
            }
        }
        Ok(text)
    }
}

fn apply_unary(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    if let Some(n) = operand.as_number() {
        return Ok(match op {
            UnaryOp::Negative => Value::Number(-n),
            // `!` on a number tests positivity rather than truthiness.
            UnaryOp::Not => Value::Bool(n > 0.0),
        });
    }
    if let Some(b) = operand.as_bool() {
        return match op {
            UnaryOp::Negative => Err(RuntimeError::TypeError(
                "cannot negate a boolean".to_string(),
            )),
            UnaryOp::Not => Ok(Value::Bool(!b)),
        };
    }
    Err(RuntimeError::TypeError(
        "expected a number or boolean".to_string(),
    ))
}

// The numeric view is tried first; only when both operands fall out of it
// does the boolean view get a chance. Each view admits its own operators
// and rejects the rest outright, so there is no mixed-type arithmetic.
fn apply_binary(lhs: &Value, op: BinaryOp, rhs: &Value) -> Result<Value, RuntimeError> {
    if let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number()) {
        return match op {
            BinaryOp::Add => Ok(Value::Number(l + r)),
            BinaryOp::Subtract => Ok(Value::Number(l - r)),
            BinaryOp::Multiply => Ok(Value::Number(l * r)),
            // IEEE division: dividing by zero yields an infinity
            BinaryOp::Divide => Ok(Value::Number(l / r)),
            BinaryOp::Less => Ok(Value::Bool(l < r)),
            BinaryOp::LessEqual => Ok(Value::Bool(l <= r)),
            BinaryOp::Greater => Ok(Value::Bool(l > r)),
            BinaryOp::GreaterEqual => Ok(Value::Bool(l >= r)),
            BinaryOp::Equal => Ok(Value::Bool(l == r)),
            BinaryOp::NotEqual => Ok(Value::Bool(l != r)),
            BinaryOp::And => Err(RuntimeError::TypeError(
                "cannot AND two numbers".to_string(),
            )),
            BinaryOp::Or => Err(RuntimeError::TypeError("cannot OR two numbers".to_string())),
        };
    }
    if let (Some(l), Some(r)) = (lhs.as_bool(), rhs.as_bool()) {
        return match op {
            BinaryOp::Equal => Ok(Value::Bool(l == r)),
            BinaryOp::NotEqual => Ok(Value::Bool(l != r)),
            BinaryOp::And => Ok(Value::Bool(l && r)),
            BinaryOp::Or => Ok(Value::Bool(l || r)),
            BinaryOp::Add => Err(RuntimeError::TypeError(
                "cannot add two booleans".to_string(),
            )),
            BinaryOp::Subtract => Err(RuntimeError::TypeError(
                "cannot subtract two booleans".to_string(),
            )),
            BinaryOp::Multiply => Err(RuntimeError::TypeError(
                "cannot multiply two booleans".to_string(),
            )),
            BinaryOp::Divide => Err(RuntimeError::TypeError(
                "cannot divide two booleans".to_string(),
            )),
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                Err(RuntimeError::TypeError(
                    "cannot compare two booleans".to_string(),
                ))
            }
        };
    }
    Err(RuntimeError::TypeError(
        "expected a number or boolean".to_string(),
    ))
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use crate::parser::Parser;
    use crate::runtime::window::NoopWindow;
    use crate::scanner::Scanner;

    use super::*;

    /// A `print` sink the test can read back after the interpreter is done
    /// with its half.
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run(code: &str) -> Interpreter {
        try_run(code).unwrap()
    }

    fn try_run(code: &str) -> Result<Interpreter, RuntimeError> {
        let mut interpreter = Interpreter::new(Box::new(NoopWindow));
        let mut parser = Parser::new(Scanner::new(code)).unwrap();
        while let Some(statement) = parser.parse_statement().unwrap() {
            interpreter.execute_statement(&statement)?;
        }
        Ok(interpreter)
    }

    fn run_error(code: &str) -> RuntimeError {
        try_run(code).err().expect("expected a runtime error")
    }

    fn var(interpreter: &Interpreter, name: &str) -> Value {
        interpreter
            .try_get_variable(name)
            .unwrap_or_else(|| panic!("variable {name} is unbound"))
    }

    #[test]
    fn arithmetic_precedence() {
        let i = run("x = 1 + 2 * 3\ny = (1 + 2) * 3\nz = 1 - 2 - 3");
        assert_eq!(Value::Number(7.0), var(&i, "x"));
        assert_eq!(Value::Number(9.0), var(&i, "y"));
        assert_eq!(Value::Number(-4.0), var(&i, "z"));
    }

    #[test]
    fn division_follows_ieee() {
        let i = run("x = 1 / 0");
        assert_eq!(Value::Number(f64::INFINITY), var(&i, "x"));
    }

    #[test]
    fn numbers_cannot_be_anded() {
        let err = run_error("x = 1 && 1");
        assert!(err.to_string().contains("cannot AND two numbers"));
    }

    #[test]
    fn booleans_cannot_be_added_or_ordered() {
        assert!(run_error("x = TRUE + FALSE")
            .to_string()
            .contains("cannot add two booleans"));
        assert!(run_error("x = TRUE < FALSE")
            .to_string()
            .contains("cannot compare two booleans"));
    }

    #[test]
    fn boolean_logic() {
        let i = run("a = TRUE && FALSE\nb = TRUE || FALSE\nc = TRUE == FALSE");
        assert_eq!(Value::Bool(false), var(&i, "a"));
        assert_eq!(Value::Bool(true), var(&i, "b"));
        assert_eq!(Value::Bool(false), var(&i, "c"));
    }

    #[test]
    fn string_scalars_duck_type_as_numbers() {
        let i = run("x = \"2\" * \"3\"");
        assert_eq!(Value::Number(6.0), var(&i, "x"));
    }

    #[test]
    fn mixed_scalar_kinds_are_a_type_error() {
        let err = run_error("x = 1 + TRUE");
        assert!(err.to_string().contains("expected a number or boolean"));
    }

    #[test]
    fn unary_negation_and_positivity_test() {
        let i = run("a = -5\nb = !5\nc = !0\nd = !-3\ne = !TRUE");
        assert_eq!(Value::Number(-5.0), var(&i, "a"));
        assert_eq!(Value::Bool(true), var(&i, "b"));
        assert_eq!(Value::Bool(false), var(&i, "c"));
        assert_eq!(Value::Bool(false), var(&i, "d"));
        assert_eq!(Value::Bool(false), var(&i, "e"));
    }

    #[test]
    fn negating_a_boolean_fails() {
        let err = run_error("x = -TRUE");
        assert!(err.to_string().contains("cannot negate a boolean"));
    }

    #[test]
    fn if_branches() {
        let i = run(
            "x = 2\n\
             IF x > 1 THEN\n\
                 y = 1\n\
             ELSE IF x > 0 THEN\n\
                 y = 2\n\
             ELSE\n\
                 y = 3\n\
             END IF",
        );
        assert_eq!(Value::Number(1.0), var(&i, "y"));
    }

    #[test]
    fn else_if_chain_picks_the_middle_arm() {
        let i = run(
            "x = 0.5\n\
             IF x > 1 THEN\n\
                 y = 1\n\
             ELSE IF x > 0 THEN\n\
                 y = 2\n\
             ELSE\n\
                 y = 3\n\
             END IF",
        );
        assert_eq!(Value::Number(2.0), var(&i, "y"));
    }

    #[test]
    fn if_condition_must_be_boolean() {
        let err = run_error("IF 1 THEN\nx = 1\nEND IF");
        assert!(err.to_string().contains("expected a boolean condition"));
    }

    #[test]
    fn for_range_is_inclusive_and_variable_persists() {
        let i = run("sum = 0\nFOR i = 1 TO 3 THEN\nsum = sum + i\nEND FOR");
        assert_eq!(Value::Number(6.0), var(&i, "sum"));
        assert_eq!(Value::Number(3.0), var(&i, "i"));
    }

    #[test]
    fn for_bounds_must_be_numeric() {
        let err = run_error("FOR i = TRUE TO 3 THEN\nEND FOR");
        assert!(err.to_string().contains("expected numeric loop bounds"));
    }

    #[test]
    fn while_loop_counts() {
        let i = run("x = 0\nWHILE x < 3 THEN\nx = x + 1\nEND WHILE");
        assert_eq!(Value::Number(3.0), var(&i, "x"));
    }

    #[test]
    fn break_ends_only_the_innermost_while() {
        let i = run(
            "outer = 0\n\
             inner = 0\n\
             WHILE outer < 2 THEN\n\
                 outer = outer + 1\n\
                 WHILE TRUE THEN\n\
                     inner = inner + 1\n\
                     BREAK\n\
                 END WHILE\n\
             END WHILE",
        );
        assert_eq!(Value::Number(2.0), var(&i, "outer"));
        assert_eq!(Value::Number(2.0), var(&i, "inner"));
    }

    #[test]
    fn break_passes_through_an_if() {
        let i = run(
            "x = 10\n\
             WHILE TRUE THEN\n\
                 x = x - 1\n\
                 IF x < 5 THEN\n\
                     BREAK\n\
                 END IF\n\
             END WHILE",
        );
        assert_eq!(Value::Number(4.0), var(&i, "x"));
    }

    #[test]
    fn break_in_a_for_body_unwinds_to_the_enclosing_while() {
        // Only WHILE resolves a break; a FOR passes it along.
        let i = run(
            "rounds = 0\n\
             WHILE rounds < 5 THEN\n\
                 rounds = rounds + 1\n\
                 FOR i = 1 TO 10 THEN\n\
                     BREAK\n\
                 END FOR\n\
             END WHILE",
        );
        assert_eq!(Value::Number(1.0), var(&i, "rounds"));
        assert_eq!(Value::Number(1.0), var(&i, "i"));
    }

    #[test]
    fn break_in_a_bare_for_is_an_error() {
        assert!(matches!(
            run_error("FOR i = 1 TO 3 THEN\nBREAK\nEND FOR"),
            RuntimeError::BreakOutsideLoop
        ));
    }

    #[test]
    fn break_outside_a_loop_is_an_error() {
        assert!(matches!(run_error("BREAK"), RuntimeError::BreakOutsideLoop));
        assert!(matches!(
            run_error("IF TRUE THEN\nBREAK\nEND IF"),
            RuntimeError::BreakOutsideLoop
        ));
    }

    #[test]
    fn return_outside_a_function_is_an_error() {
        assert!(matches!(
            run_error("RETURN 1"),
            RuntimeError::ReturnOutsideFunction
        ));
    }

    #[test]
    fn function_call_returns_a_value() {
        let i = run("DEF add(a, b) THEN\nRETURN a + b\nEND DEF\nx = add(1, 2)");
        assert_eq!(Value::Number(3.0), var(&i, "x"));
    }

    #[test]
    fn function_without_return_yields_null() {
        let i = run("DEF noop() THEN\nx = 1\nEND DEF\ny = noop()");
        assert_eq!(Value::Null, var(&i, "y"));
    }

    #[test]
    fn function_locals_do_not_leak() {
        let i = run("DEF f() THEN\nlocal = 42\nRETURN local\nEND DEF\nx = f()");
        assert_eq!(Value::Number(42.0), var(&i, "x"));
        assert_eq!(None, i.try_get_variable("local"));
    }

    #[test]
    fn return_unwinds_through_a_loop() {
        let i = run(
            "DEF first_over(limit) THEN\n\
                 n = 0\n\
                 WHILE TRUE THEN\n\
                     n = n + 1\n\
                     IF n > limit THEN\n\
                         RETURN n\n\
                     END IF\n\
                 END WHILE\n\
             END DEF\n\
             x = first_over(3)",
        );
        assert_eq!(Value::Number(4.0), var(&i, "x"));
    }

    #[test]
    fn closures_capture_the_defining_scope() {
        let i = run(
            "DEF make_adder(n) THEN\n\
                 DEF add(x) THEN\n\
                     RETURN x + n\n\
                 END DEF\n\
                 RETURN add\n\
             END DEF\n\
             add_five = make_adder(5)\n\
             x = add_five(3)",
        );
        assert_eq!(Value::Number(8.0), var(&i, "x"));
    }

    #[test]
    fn recursion() {
        let i = run(
            "DEF fib(n) THEN\n\
                 IF n < 2 THEN\n\
                     RETURN n\n\
                 END IF\n\
                 RETURN fib(n - 1) + fib(n - 2)\n\
             END DEF\n\
             x = fib(10)",
        );
        assert_eq!(Value::Number(55.0), var(&i, "x"));
    }

    #[test]
    fn redefinition_overwrites() {
        let i = run(
            "DEF f() THEN\nRETURN 1\nEND DEF\n\
             DEF f() THEN\nRETURN 2\nEND DEF\n\
             x = f()",
        );
        assert_eq!(Value::Number(2.0), var(&i, "x"));
    }

    #[test]
    fn arity_is_checked_exactly() {
        let err = run_error("DEF zero() THEN\nRETURN 0\nEND DEF\nx = zero(1)");
        assert!(err.to_string().contains("zero expects 0 arguments, got 1"));
    }

    #[test]
    fn calling_a_non_function_fails() {
        let err = run_error("x = 1\ny = x()");
        assert!(err.to_string().contains("not a function: x"));
    }

    #[test]
    fn calling_an_unknown_name_fails() {
        let err = run_error("y = nothing_here()");
        assert!(err.to_string().contains("undefined variable"));
    }

    #[test]
    fn interpolation_substitutes_variables() {
        let i = run("name = \"Alice\"\ngreeting = \"Hello, {name}!\"");
        assert_eq!(Value::Str(Rc::from("Hello, Alice!")), var(&i, "greeting"));
    }

    #[test]
    fn interpolation_trims_the_name_and_formats_scalars() {
        let i = run("x = 1.5\nok = TRUE\ns = \"{ x } and {ok}\"");
        assert_eq!(Value::Str(Rc::from("1.5 and True")), var(&i, "s"));
    }

    #[test]
    fn doubled_braces_are_literals() {
        let i = run("s = \"{{literal}}\"");
        assert_eq!(Value::Str(Rc::from("{literal}")), var(&i, "s"));
    }

    #[test]
    fn unmatched_open_brace_fails() {
        let err = run_error("s = \"oops {\"");
        assert!(err.to_string().contains("mismatched '{'"));
    }

    #[test]
    fn bare_close_brace_fails() {
        let err = run_error("s = \"oops }\"");
        assert!(err.to_string().contains("mismatched '}'"));
    }

    #[test]
    fn interpolating_a_function_fails() {
        let err = run_error("DEF f() THEN\nRETURN 1\nEND DEF\ns = \"{f}\"");
        assert!(err.to_string().contains("is not a scalar"));
    }

    #[test]
    fn print_concatenates_and_terminates_the_line() {
        let buffer = SharedBuffer::default();
        let mut interpreter =
            Interpreter::with_output(Box::new(NoopWindow), Box::new(buffer.clone()));
        let mut parser = Parser::new(Scanner::new("print(\"a\", 1, TRUE)")).unwrap();
        while let Some(statement) = parser.parse_statement().unwrap() {
            interpreter.execute_statement(&statement).unwrap();
        }
        assert_eq!("a1True\n", buffer.contents());
    }

    #[test]
    fn random_with_a_collapsed_range_is_deterministic() {
        let i = run("x = random(1, 1)");
        assert_eq!(Value::Number(1.0), var(&i, "x"));
    }

    #[test]
    fn random_checks_its_arguments() {
        assert!(run_error("x = random(1)").to_string().contains("arguments"));
        assert!(run_error("x = random(\"a\", 2)")
            .to_string()
            .contains("whole number"));
        assert!(run_error("x = random(2, 1)")
            .to_string()
            .contains("empty range"));
    }
}
