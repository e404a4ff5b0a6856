//! Tree-walking evaluator.
//!
//! A flat two-level scope: the current call frame, then globals, with no
//! lexical chain in between.

use std::collections::HashMap;

use log::{debug, trace};

use crate::ast::{ArithOp, CompareOp, Expr, Stmt};
use crate::error::{ArityError, InterpError, NameError, TypeError};

pub type IResult<T> = Result<T, InterpError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Void,
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Void => "void",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// The stringifier used by `Say` and `Concat`. `Float` goes through `{:?}`
/// rather than `{}` because Rust's `Display` for `f64` drops the decimal
/// point on whole numbers, and output here should always keep at least one
/// digit after it (e.g. `5.0`, not `5`).
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::String(s) => s.clone(),
        Value::Boolean(true) => "对".to_owned(),
        Value::Boolean(false) => "错".to_owned(),
        Value::Void => String::new(),
    }
}

#[derive(Debug, Clone)]
struct FuncDef {
    params: Vec<String>,
    body: Vec<Stmt>,
}

/// Signals early return unwinding to the nearest enclosing call frame.
enum Flow {
    Normal,
    Return(Value),
}

#[derive(Default)]
pub struct Interpreter {
    globals: HashMap<String, Value>,
    functions: HashMap<String, FuncDef>,
    /// Call-frame stack. Only function calls push a frame; loop bodies and
    /// conditional bodies do not introduce a new scope.
    frames: Vec<HashMap<String, Value>>,
    output: String,
}

/// Runs a program to completion, returning everything `Say` emitted.
///
/// Errors carry whatever output had already been buffered.
pub fn run(program: &[Stmt]) -> Result<String, InterpError> {
    let mut interpreter = Interpreter::default();

    let result = interpreter.exec_stmts(program);
    match result {
        Ok(Flow::Normal) => Ok(interpreter.output),
        Ok(Flow::Return(_)) => Err(attach_output(
            InterpError::ReturnOutsideFunction {
                partial_output: String::new(),
            },
            &interpreter.output,
        )),
        Err(err) => Err(attach_output(err, &interpreter.output)),
    }
}

fn attach_output(mut err: InterpError, output: &str) -> InterpError {
    match &mut err {
        InterpError::Parse(e) => e.partial_output = output.to_owned(),
        InterpError::Name(e) => e.partial_output = output.to_owned(),
        InterpError::Type(e) => e.partial_output = output.to_owned(),
        InterpError::Arity(e) => e.partial_output = output.to_owned(),
        InterpError::ReturnOutsideFunction { partial_output } => {
            *partial_output = output.to_owned()
        }
    }
    err
}

fn name_error(name: &str) -> InterpError {
    InterpError::Name(NameError {
        name: name.to_owned(),
        partial_output: String::new(),
    })
}

fn type_error(message: impl Into<String>) -> InterpError {
    InterpError::Type(TypeError {
        message: message.into(),
        partial_output: String::new(),
    })
}

impl Interpreter {
    fn env_get(&self, name: &str) -> Option<Value> {
        if let Some(frame) = self.frames.last() {
            if let Some(value) = frame.get(name) {
                return Some(value.clone());
            }
        }
        self.globals.get(name).cloned()
    }

    /// Writes to the current frame if the name is already bound there,
    /// otherwise to globals, so top-level variables stay mutable from
    /// inside a function unless shadowed by a parameter.
    fn env_set(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.contains_key(name) {
                frame.insert(name.to_owned(), value);
                return;
            }
        }
        self.globals.insert(name.to_owned(), value);
    }

    fn exec_stmts(&mut self, stmts: &[Stmt]) -> IResult<Flow> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => continue,
                returned @ Flow::Return(_) => return Ok(returned),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> IResult<Flow> {
        match stmt {
            Stmt::VarDecl(name) => {
                if self.env_get(name).is_none() {
                    self.env_set(name, Value::Integer(0));
                }
                Ok(Flow::Normal)
            }
            Stmt::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.env_set(name, value);
                Ok(Flow::Normal)
            }
            Stmt::Say(expr) => {
                let value = self.eval_expr(expr)?;
                self.output.push_str(&stringify(&value));
                self.output.push('\n');
                Ok(Flow::Normal)
            }
            Stmt::IncBy { name, delta } => self.step_by(name, delta, 1.0),
            Stmt::DecBy { name, delta } => self.step_by(name, delta, -1.0),
            Stmt::Loop {
                counter,
                start,
                end,
                body,
            } => self.exec_loop(counter, start, end, body),
            Stmt::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.eval_expr(condition)?;
                let Value::Boolean(condition) = condition else {
                    return Err(type_error(format!(
                        "condition must be boolean, got {}",
                        condition.type_name()
                    )));
                };
                if condition {
                    self.exec_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::FuncDef { name, params, body } => {
                trace!("defining function '{name}' with {} parameter(s)", params.len());
                self.functions.insert(
                    name.clone(),
                    FuncDef {
                        params: params.clone(),
                        body: body.clone(),
                    },
                );
                Ok(Flow::Normal)
            }
            Stmt::Call(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Block(stmts) => self.exec_stmts(stmts),
        }
    }

    fn step_by(&mut self, name: &str, delta: &Expr, sign: f64) -> IResult<Flow> {
        let current = self
            .env_get(name)
            .ok_or_else(|| name_error(name))?;
        let delta = self.eval_expr(delta)?;
        let current_n = current
            .as_f64()
            .ok_or_else(|| type_error(format!("'{name}' is not numeric")))?;
        let delta_n = delta
            .as_f64()
            .ok_or_else(|| type_error("increment/decrement amount must be numeric"))?;

        let updated = match (&current, &delta) {
            (Value::Integer(a), Value::Integer(b)) => {
                Value::Integer(a + sign as i64 * b)
            }
            _ => Value::Float(current_n + sign * delta_n),
        };
        self.env_set(name, updated);
        Ok(Flow::Normal)
    }

    fn exec_loop(&mut self, counter: &str, start: &Expr, end: &Expr, body: &[Stmt]) -> IResult<Flow> {
        let start = self.eval_expr(start)?;
        let end = self.eval_expr(end)?;
        let start = as_loop_bound(&start)?;
        let end = as_loop_bound(&end)?;

        // Counting down when start > end, executing once when equal.
        let step: i64 = if end >= start { 1 } else { -1 };
        let mut i = start;
        loop {
            self.env_set(counter, Value::Integer(i));
            match self.exec_stmts(body)? {
                Flow::Normal => {}
                returned @ Flow::Return(_) => return Ok(returned),
            }
            if i == end {
                break;
            }
            i += step;
        }
        Ok(Flow::Normal)
    }

    fn eval_expr(&mut self, expr: &Expr) -> IResult<Value> {
        match expr {
            Expr::Int(n) => Ok(Value::Integer(*n)),
            Expr::Str(s) => Ok(Value::String(s.clone())),
            Expr::Variable(name) => self.env_get(name).ok_or_else(|| name_error(name)),
            Expr::Paren(inner) => self.eval_expr(inner),
            Expr::Arithmetic { lhs, op, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                eval_arithmetic(op, lhs, rhs)
            }
            Expr::Comparison { lhs, op, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                eval_comparison(op, lhs, rhs)
            }
            Expr::Call { callee, args } => self.eval_call(callee, args),
            Expr::Concat(parts) => {
                let mut joined = String::new();
                for part in parts {
                    let value = self.eval_expr(part)?;
                    joined.push_str(&stringify(&value));
                }
                Ok(Value::String(joined))
            }
        }
    }

    fn eval_call(&mut self, callee: &str, args: &[Expr]) -> IResult<Value> {
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval_expr(arg)?);
        }

        let func = self
            .functions
            .get(callee)
            .cloned()
            .ok_or_else(|| name_error(callee))?;

        if func.params.len() != arg_values.len() {
            return Err(InterpError::Arity(ArityError {
                name: callee.to_owned(),
                expected: func.params.len(),
                got: arg_values.len(),
                partial_output: String::new(),
            }));
        }

        debug!("calling '{callee}' with {} argument(s)", arg_values.len());

        let mut frame = HashMap::new();
        for (param, value) in func.params.iter().zip(arg_values) {
            frame.insert(param.clone(), value);
        }
        self.frames.push(frame);
        let flow = self.exec_stmts(&func.body);
        self.frames.pop();

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Void),
        }
    }
}

fn as_loop_bound(value: &Value) -> IResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Float(f) => Ok(*f as i64),
        other => Err(type_error(format!(
            "loop bounds must be numeric, got {}",
            other.type_name()
        ))),
    }
}

fn eval_arithmetic(op: &ArithOp, lhs: Value, rhs: Value) -> IResult<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (&lhs, &rhs) {
        return Ok(match op {
            ArithOp::Add => Value::Integer(a + b),
            ArithOp::Sub => Value::Integer(a - b),
            ArithOp::Mul => Value::Integer(a * b),
            // Integer / Integer always promotes to Float.
            ArithOp::Div => Value::Float(*a as f64 / *b as f64),
        });
    }

    let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) else {
        return Err(type_error(format!(
            "arithmetic requires numeric operands, got {} and {}",
            lhs.type_name(),
            rhs.type_name()
        )));
    };

    Ok(Value::Float(match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
    }))
}

fn eval_comparison(op: &CompareOp, lhs: Value, rhs: Value) -> IResult<Value> {
    match op {
        CompareOp::Greater | CompareOp::Less => {
            let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) else {
                return Err(type_error(format!(
                    "comparison requires numeric operands, got {} and {}",
                    lhs.type_name(),
                    rhs.type_name()
                )));
            };
            let result = match op {
                CompareOp::Greater => a > b,
                CompareOp::Less => a < b,
                _ => unreachable!(),
            };
            Ok(Value::Boolean(result))
        }
        CompareOp::Eq | CompareOp::NotEq => {
            let equal = values_equal(&lhs, &rhs)?;
            Ok(Value::Boolean(if matches!(op, CompareOp::Eq) {
                equal
            } else {
                !equal
            }))
        }
    }
}

/// Strict equality, numerically coerced for `Integer`/`Float`; strings
/// compare by contents.
fn values_equal(lhs: &Value, rhs: &Value) -> IResult<bool> {
    match (lhs, rhs) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            Ok(lhs.as_f64() == rhs.as_f64())
        }
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        (Value::Void, Value::Void) => Ok(true),
        _ => Err(type_error(format!(
            "cannot compare {} with {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn run_program(src: &str) -> String {
        let tokens = lex(src);
        let stmts = parse(tokens).expect("program should parse");
        run(&stmts).expect("program should evaluate")
    }

    #[test]
    fn variable_declare_assign_print() {
        assert_eq!(
            run_program("王麻子凶得很。王麻子巴倒250。摆哈儿：王麻子。"),
            "250\n"
        );
    }

    #[test]
    fn string_literal_say() {
        assert_eq!(
            run_program("摆哈儿：“这踏踏儿巴适得板！”。"),
            "这踏踏儿巴适得板！\n"
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(run_program("摆哈儿：五加七乘二。"), "19\n");
        assert_eq!(run_program("摆哈儿：（五加七）乘二。"), "24\n");
    }

    #[test]
    fn four_comparisons_concatenated() {
        assert_eq!(
            run_program("摆哈儿：五比二大、五比二小、一跟倒2一模一样呢、1跟倒二不一样。"),
            "对错错对\n"
        );
    }

    #[test]
    fn inclusive_loop_counts_up() {
        assert_eq!(
            run_program("王麻子从1拢3打转转儿：摆哈儿：王麻子。转完了。"),
            "1\n2\n3\n"
        );
    }

    #[test]
    fn inclusive_loop_counts_down_when_start_exceeds_end() {
        assert_eq!(
            run_program("王麻子从3拢1打转转儿：摆哈儿：王麻子。转完了。"),
            "3\n2\n1\n"
        );
    }

    #[test]
    fn recursive_factorial_via_call() {
        let program = "【阶乘】（好多）啷个办：看哈儿：好多比一小啵？要是呢话爬远点一。爬远点好多乘喊【阶乘】（好多减一）。刹脚。摆哈儿：喊【阶乘】（五）。";
        assert_eq!(run_program(program), "120\n");
    }

    #[test]
    fn division_always_promotes_to_float() {
        assert_eq!(run_program("摆哈儿：四除以二。"), "2.0\n");
        assert_eq!(run_program("摆哈儿：五除以二。"), "2.5\n");
    }

    #[test]
    fn inc_by_one_and_by_n_steps() {
        assert_eq!(
            run_program("王麻子凶得很。王麻子走哈儿。摆哈儿：王麻子。"),
            "1\n"
        );
        assert_eq!(
            run_program("王麻子凶得很。王麻子走五步。摆哈儿：王麻子。"),
            "5\n"
        );
    }

    #[test]
    fn function_call_sees_only_globals_and_parameters() {
        let program = "王麻子凶得很。王麻子巴倒十。\
            写啷个办：摆哈儿：王麻子。刹脚。\
            喊写。";
        assert_eq!(run_program(program), "10\n");
    }

    #[test]
    fn function_writes_to_global_when_not_shadowed_by_a_parameter() {
        let program = "王麻子凶得很。\
            加一（好多）啷个办：王麻子巴倒好多加一。刹脚。\
            喊加一（9）。摆哈儿：王麻子。";
        assert_eq!(run_program(program), "10\n");
    }

    #[test]
    fn return_outside_function_is_an_error() {
        let tokens = lex("爬远点一。");
        let stmts = parse(tokens).unwrap();
        assert!(matches!(
            run(&stmts),
            Err(InterpError::ReturnOutsideFunction { .. })
        ));
    }

    #[test]
    fn calling_unknown_function_is_a_name_error() {
        let tokens = lex("喊没有这个函数。");
        let stmts = parse(tokens).unwrap();
        assert!(matches!(run(&stmts), Err(InterpError::Name(_))));
    }

    #[test]
    fn wrong_arity_call_is_an_arity_error() {
        let program = "加一（好多）啷个办：爬远点好多加一。刹脚。喊加一。";
        let tokens = lex(program);
        let stmts = parse(tokens).unwrap();
        assert!(matches!(run(&stmts), Err(InterpError::Arity(_))));
    }

    #[test]
    fn non_boolean_condition_is_a_type_error() {
        let tokens = lex("看哈儿：5啵？要是呢话摆哈儿：1。");
        let stmts = parse(tokens).unwrap();
        assert!(matches!(run(&stmts), Err(InterpError::Type(_))));
    }

    #[test]
    fn partial_output_is_preserved_on_error() {
        let tokens = lex("摆哈儿：1。喊没有这个函数。");
        let stmts = parse(tokens).unwrap();
        let err = run(&stmts).unwrap_err();
        assert_eq!(err.partial_output(), "1\n");
    }
}
