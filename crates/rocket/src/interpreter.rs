use std::rc::Rc;

use indexmap::IndexMap;

use crate::builtins;
use crate::environment::Environment;
use crate::error::{ErrorKind, RocketError, RocketResult};
use crate::lexer::lex;
use crate::parser::{self, AssignTarget, Expr, Program, Stmt};
use crate::stdio::Stdio;
use crate::token::Pos;
use crate::types;
use crate::value::{DictKey, FunctionData, NativeError, Value};

/// The outcome of evaluating a statement: either it ran to completion, or
/// it raised a control-flow transfer that must propagate to the nearest
/// enclosing loop (`Break`/`Continue`) or function call (`Return`).
enum Signal {
    Normal,
    Break(Pos),
    Continue(Pos),
    Return(Value, Pos),
}

/// Lexes, parses, and evaluates a complete Rocket program, writing through
/// `stdio`. This is the library's single public entry point for running a
/// source file end to end.
pub fn run_source(src: &str, stdio: &mut dyn Stdio) -> RocketResult<()> {
    let tokens = lex(src)?;
    let program = parser::parse(tokens)?;
    let env = Environment::new_global();
    builtins::register_globals(&env);
    execute(&program, &env, stdio)
}

/// Runs an already-parsed program against a caller-supplied global
/// environment (builtins must already be registered).
pub fn execute(program: &Program, env: &Environment, stdio: &mut dyn Stdio) -> RocketResult<()> {
    for (name, params, body, _pos) in parser::hoisted_functions(program) {
        let func = Value::Function(Rc::new(FunctionData { name: Some(name.clone()), params, body, env: env.clone() }));
        env.define(name, func);
    }
    for stmt in program {
        match eval_stmt(stmt, env, stdio)? {
            Signal::Normal => {}
            Signal::Break(pos) => return Err(RocketError::ctrl_flow("break outside of a loop", pos)),
            Signal::Continue(pos) => return Err(RocketError::ctrl_flow("continue outside of a loop", pos)),
            Signal::Return(_, pos) => return Err(RocketError::ctrl_flow("return outside of a function", pos)),
        }
    }
    Ok(())
}

fn eval_block(stmts: &[Stmt], env: &Environment, stdio: &mut dyn Stdio) -> RocketResult<Signal> {
    for stmt in stmts {
        match eval_stmt(stmt, env, stdio)? {
            Signal::Normal => {}
            other => return Ok(other),
        }
    }
    Ok(Signal::Normal)
}

fn eval_stmt(stmt: &Stmt, env: &Environment, stdio: &mut dyn Stdio) -> RocketResult<Signal> {
    match stmt {
        Stmt::Let(name, expr, _pos) => {
            let value = eval_expr(expr, env, stdio)?;
            env.define(name.clone(), value);
            Ok(Signal::Normal)
        }
        Stmt::ExprStmt(expr) => {
            eval_expr(expr, env, stdio)?;
            Ok(Signal::Normal)
        }
        Stmt::Block(stmts) => eval_block(stmts, &env.child(), stdio),
        Stmt::If(cond, then_block, else_branch) => {
            if eval_expr(cond, env, stdio)?.is_truthy() {
                eval_block(then_block, &env.child(), stdio)
            } else if let Some(else_stmt) = else_branch {
                eval_stmt(else_stmt, env, stdio)
            } else {
                Ok(Signal::Normal)
            }
        }
        Stmt::While(cond, body) => eval_while(cond, body, env, stdio),
        Stmt::CFor(init, cond, post, body) => eval_c_for(init, cond, post, body, env, stdio),
        Stmt::ForOf(var, iterable, body, pos) => eval_for_of(var, iterable, body, *pos, env, stdio),
        Stmt::FnDecl(name, params, body, _pos) => {
            let func = Value::Function(Rc::new(FunctionData {
                name: Some(name.clone()),
                params: params.clone(),
                body: body.clone(),
                env: env.clone(),
            }));
            env.define(name.clone(), func);
            Ok(Signal::Normal)
        }
        Stmt::Return(expr, pos) => {
            let value = match expr {
                Some(e) => eval_expr(e, env, stdio)?,
                None => Value::Null,
            };
            Ok(Signal::Return(value, *pos))
        }
        Stmt::Break(pos) => Ok(Signal::Break(*pos)),
        Stmt::Continue(pos) => Ok(Signal::Continue(*pos)),
        Stmt::Assign(target, expr, pos) => {
            let value = eval_expr(expr, env, stdio)?;
            eval_assign(target, value, *pos, env, stdio)?;
            Ok(Signal::Normal)
        }
    }
}

fn eval_while(cond: &Expr, body: &[Stmt], env: &Environment, stdio: &mut dyn Stdio) -> RocketResult<Signal> {
    loop {
        if !eval_expr(cond, env, stdio)?.is_truthy() {
            break;
        }
        match eval_block(body, &env.child(), stdio)? {
            Signal::Normal | Signal::Continue(_) => {}
            Signal::Break(_) => break,
            ret @ Signal::Return(..) => return Ok(ret),
        }
    }
    Ok(Signal::Normal)
}

fn eval_c_for(
    init: &Option<Box<Stmt>>,
    cond: &Option<Expr>,
    post: &Option<Expr>,
    body: &[Stmt],
    env: &Environment,
    stdio: &mut dyn Stdio,
) -> RocketResult<Signal> {
    let loop_env = env.child();
    if let Some(init) = init {
        match eval_stmt(init, &loop_env, stdio)? {
            Signal::Normal => {}
            other => return Ok(other),
        }
    }
    loop {
        if let Some(cond) = cond {
            if !eval_expr(cond, &loop_env, stdio)?.is_truthy() {
                break;
            }
        }
        match eval_block(body, &loop_env.child(), stdio)? {
            Signal::Normal | Signal::Continue(_) => {}
            Signal::Break(_) => break,
            ret @ Signal::Return(..) => return Ok(ret),
        }
        if let Some(post) = post {
            eval_expr(post, &loop_env, stdio)?;
        }
    }
    Ok(Signal::Normal)
}

fn eval_for_of(
    var: &Rc<str>,
    iterable: &Expr,
    body: &[Stmt],
    pos: Pos,
    env: &Environment,
    stdio: &mut dyn Stdio,
) -> RocketResult<Signal> {
    let iterable = eval_expr(iterable, env, stdio)?;
    let items = iterate(&iterable, pos)?;
    for item in items {
        let frame = env.child();
        frame.define(var.clone(), item);
        match eval_block(body, &frame, stdio)? {
            Signal::Normal | Signal::Continue(_) => {}
            Signal::Break(_) => break,
            ret @ Signal::Return(..) => return Ok(ret),
        }
    }
    Ok(Signal::Normal)
}

/// Materializes the sequence of values a `for (let x of it)` loop binds `x`
/// to, in order. Dict yields keys; Str yields one-char Strs, one per
/// Unicode scalar value.
fn iterate(value: &Value, pos: Pos) -> RocketResult<Vec<Value>> {
    match value {
        Value::List(l) => Ok(l.borrow().clone()),
        Value::Dict(d) => Ok(d.borrow().keys().map(DictKey::to_value).collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(Rc::from(c.to_string().as_str()))).collect()),
        Value::Range(start, stop, step) => {
            let mut out = Vec::new();
            let mut i = *start;
            if *step > 0 {
                while i < *stop {
                    out.push(Value::Int(i));
                    i += step;
                }
            } else {
                while i > *stop {
                    out.push(Value::Int(i));
                    i += step;
                }
            }
            Ok(out)
        }
        other => Err(RocketError::type_error(format!("{} is not iterable", other.type_name()), pos)),
    }
}

fn eval_assign(target: &AssignTarget, value: Value, pos: Pos, env: &Environment, stdio: &mut dyn Stdio) -> RocketResult<()> {
    match target {
        AssignTarget::Index(target_expr, key_expr) => {
            let target_val = eval_expr(target_expr, env, stdio)?;
            let key_val = eval_expr(key_expr, env, stdio)?;
            match &target_val {
                Value::List(list) => {
                    let idx = as_index(&key_val, pos)?;
                    let mut list = list.borrow_mut();
                    let resolved = types::list::resolve_index(list.len(), idx)
                        .map_err(|e| native_to_rocket(e, pos))?;
                    list[resolved] = value;
                    Ok(())
                }
                Value::Dict(dict) => {
                    let key = key_val
                        .dict_key()
                        .ok_or_else(|| RocketError::type_error(format!("unhashable type: {}", key_val.type_name()), pos))?;
                    dict.borrow_mut().insert(key, value);
                    Ok(())
                }
                other => Err(RocketError::type_error(format!("cannot index-assign into {}", other.type_name()), pos)),
            }
        }
        AssignTarget::Attr(target_expr, name) => {
            let target_val = eval_expr(target_expr, env, stdio)?;
            match &target_val {
                Value::Dict(dict) => {
                    dict.borrow_mut().insert(DictKey::Str(name.clone()), value);
                    Ok(())
                }
                other => Err(RocketError::attr(format!("{} has no assignable attribute `{name}`", other.type_name()), pos)),
            }
        }
    }
}

fn as_index(value: &Value, pos: Pos) -> RocketResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(RocketError::type_error(format!("index must be an int, got {}", other.type_name()), pos)),
    }
}

fn native_to_rocket(err: NativeError, pos: Pos) -> RocketError {
    RocketError::new(err.kind, err.message, pos)
}

pub fn eval_expr(expr: &Expr, env: &Environment, stdio: &mut dyn Stdio) -> RocketResult<Value> {
    match expr {
        Expr::Int(n, _) => Ok(Value::Int(*n)),
        Expr::Float(f, _) => Ok(Value::Float(*f)),
        Expr::Str(s, _) => Ok(Value::Str(s.clone())),
        Expr::Null(_) => Ok(Value::Null),
        Expr::Bool(b, _) => Ok(Value::Bool(*b)),
        Expr::List(elems, _) => {
            let mut out = Vec::with_capacity(elems.len());
            for e in elems {
                out.push(eval_expr(e, env, stdio)?);
            }
            Ok(Value::List(Rc::new(std::cell::RefCell::new(out))))
        }
        Expr::Dict(pairs, _) => {
            let mut map = IndexMap::new();
            for (k, v) in pairs {
                let key_val = eval_expr(k, env, stdio)?;
                let value = eval_expr(v, env, stdio)?;
                let key = key_val
                    .dict_key()
                    .ok_or_else(|| RocketError::type_error(format!("unhashable type: {}", key_val.type_name()), k.pos()))?;
                map.insert(key, value);
            }
            Ok(Value::Dict(Rc::new(std::cell::RefCell::new(map))))
        }
        Expr::Name(name, pos) => env.lookup(name).ok_or_else(|| RocketError::name(format!("undefined name `{name}`"), *pos)),
        Expr::Index(target, key, pos) => {
            let target_val = eval_expr(target, env, stdio)?;
            let key_val = eval_expr(key, env, stdio)?;
            eval_index(&target_val, &key_val, *pos)
        }
        Expr::Attr(target, name, pos) => {
            let target_val = eval_expr(target, env, stdio)?;
            eval_attr(&target_val, name, *pos)
        }
        Expr::Call(callee, args, pos) => {
            let callee_val = eval_expr(callee, env, stdio)?;
            let mut arg_vals = Vec::with_capacity(args.len());
            for a in args {
                arg_vals.push(eval_expr(a, env, stdio)?);
            }
            call_value(&callee_val, arg_vals, *pos, stdio)
        }
    }
}

fn eval_index(target: &Value, key: &Value, pos: Pos) -> RocketResult<Value> {
    match target {
        Value::List(list) => {
            let idx = as_index(key, pos)?;
            let list = list.borrow();
            let resolved = types::list::resolve_index(list.len(), idx).map_err(|e| native_to_rocket(e, pos))?;
            Ok(list[resolved].clone())
        }
        Value::Dict(dict) => {
            let dict_key = key.dict_key().ok_or_else(|| RocketError::type_error(format!("unhashable type: {}", key.type_name()), pos))?;
            dict.borrow().get(&dict_key).cloned().ok_or_else(|| RocketError::key(format!("key not found: {key}"), pos))
        }
        Value::Str(s) => {
            let idx = as_index(key, pos)?;
            let chars: Vec<char> = s.chars().collect();
            let resolved = types::list::resolve_index(chars.len(), idx).map_err(|e| native_to_rocket(e, pos))?;
            Ok(Value::Str(Rc::from(chars[resolved].to_string().as_str())))
        }
        other => Err(RocketError::type_error(format!("{} is not subscriptable", other.type_name()), pos)),
    }
}

fn eval_attr(target: &Value, name: &str, pos: Pos) -> RocketResult<Value> {
    if let Value::Dict(dict) = target {
        if let Some(v) = dict.borrow().get(&DictKey::Str(Rc::from(name))) {
            return Ok(v.clone());
        }
    }
    match types::lookup_method(target, name) {
        Some(method) => Ok(Value::BoundMethod(Box::new(target.clone()), method)),
        None => Err(RocketError::attr(format!("{} has no attribute `{name}`", target.type_name()), pos)),
    }
}

fn call_value(callee: &Value, args: Vec<Value>, pos: Pos, stdio: &mut dyn Stdio) -> RocketResult<Value> {
    match callee {
        Value::Function(data) => call_user_function(data, args, pos, stdio),
        Value::BuiltinFunction(b) => (b.func)(stdio, &args).map_err(|e| native_to_rocket(e, pos)),
        Value::BoundMethod(receiver, b) => {
            let mut full_args = Vec::with_capacity(args.len() + 1);
            full_args.push((**receiver).clone());
            full_args.extend(args);
            (b.func)(stdio, &full_args).map_err(|e| native_to_rocket(e, pos))
        }
        other => Err(RocketError::type_error(format!("{} is not callable", other.type_name()), pos)),
    }
}

fn call_user_function(data: &Rc<FunctionData>, args: Vec<Value>, pos: Pos, stdio: &mut dyn Stdio) -> RocketResult<Value> {
    if args.len() != data.params.len() {
        return Err(RocketError::new(
            ErrorKind::ArityError,
            format!(
                "{}() takes {} argument(s), got {}",
                data.name.as_deref().unwrap_or("<anonymous>"),
                data.params.len(),
                args.len()
            ),
            pos,
        ));
    }
    let call_env = data.env.child();
    for (param, value) in data.params.iter().zip(args) {
        call_env.define(param.clone(), value);
    }
    match eval_block(&data.body, &call_env, stdio)? {
        Signal::Normal => Ok(Value::Null),
        Signal::Return(value, _) => Ok(value),
        Signal::Break(pos) => Err(RocketError::ctrl_flow("break outside of a loop", pos)),
        Signal::Continue(pos) => Err(RocketError::ctrl_flow("continue outside of a loop", pos)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio::CollectingStdio;

    fn run(src: &str) -> (RocketResult<()>, String) {
        let mut io = CollectingStdio::default();
        let result = run_source(src, &mut io);
        (result, io.output)
    }

    #[test]
    fn fibonacci_recursion() {
        let (result, out) = run(
            "fn fib(n){ if (lt(n,2)){ return n; } return add(fib(sub(n,1)), fib(sub(n,2))); } print(fib(10));",
        );
        result.unwrap();
        assert_eq!(out, "55\n");
    }

    #[test]
    fn list_replication_and_count() {
        let (result, out) = run("let a = mul([false], 3); a[1] = true; print(a.count(true));");
        result.unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn for_of_over_string() {
        let (result, out) = run(r#"for (let c of "abc") { print(c); }"#);
        result.unwrap();
        assert_eq!(out, "a\nb\nc\n");
    }

    #[test]
    fn dict_iteration_yields_keys() {
        let (result, out) = run(r#"let d = {"x": 1, "y": 2}; for (let k of d) { print(k); }"#);
        result.unwrap();
        assert_eq!(out, "x\ny\n");
    }

    #[test]
    fn hoisting_allows_forward_reference() {
        let (result, out) = run("print(g()); fn g(){ return 42; }");
        result.unwrap();
        assert_eq!(out, "42\n");
    }

    #[test]
    fn break_outside_loop_is_ctrl_flow_error() {
        let (result, _) = run("break;");
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::CtrlFlowError);
        assert_eq!(err.pos, Pos::new(1, 1));
    }

    #[test]
    fn block_scope_does_not_leak() {
        let (result, _) = run("{ let x = 1; } print(x);");
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
    }

    #[test]
    fn closure_over_block_scope_via_returned_function() {
        let (result, out) = run(
            "fn make() { let x = 99; fn grab() { return x; } return grab; } let g = make(); print(g());",
        );
        result.unwrap();
        assert_eq!(out, "99\n");
    }

    #[test]
    fn for_of_binds_fresh_frame_per_iteration() {
        let (result, out) = run(
            "let fns = []; for (let i of range(3)) { fn make() { return i; } fns.push(make); } for (let f of fns) { print(f()); }",
        );
        result.unwrap();
        assert_eq!(out, "0\n1\n2\n");
    }

    #[test]
    fn arity_error_on_builtin_misuse() {
        let (result, _) = run("add(1);");
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityError);
    }

    #[test]
    fn while_continue_jumps_back_to_cond_reevaluation() {
        let (result, out) = run(
            "let seen = []; while (lt(seen.length(), 5)) { seen.push(null); if (eq(mod(seen.length(), 2), 0)) { continue; } print(seen.length()); }",
        );
        result.unwrap();
        assert_eq!(out, "1\n3\n5\n");
    }

    #[test]
    fn unhashable_dict_literal_key_reports_the_keys_own_position() {
        let (result, _) = run("\n\nlet d = {[1]: 1};");
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(format!("{}", err.pos), "3:10");
    }
}
