use std::io::Write;

use rand::Rng;

use super::interpreter::{Interpreter, RuntimeError};
use super::value::Value;

/// A natively implemented function, dispatched by name ahead of any user
/// definition. An `arity` of `None` accepts any number of arguments.
pub(super) struct Builtin {
    pub name: &'static str,
    pub arity: Option<usize>,
    pub call: fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>,
}

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "print",
        arity: None,
        call: print,
    },
    Builtin {
        name: "PRINT",
        arity: None,
        call: print,
    },
    Builtin {
        name: "clear",
        arity: Some(0),
        call: clear,
    },
    Builtin {
        name: "present",
        arity: Some(0),
        call: present,
    },
    Builtin {
        name: "drawCircle",
        arity: Some(3),
        call: draw_circle,
    },
    Builtin {
        name: "drawText",
        arity: Some(3),
        call: draw_text,
    },
    Builtin {
        name: "drawSprite",
        arity: Some(3),
        call: draw_sprite,
    },
    Builtin {
        name: "playSound",
        arity: Some(1),
        call: play_sound,
    },
    Builtin {
        name: "random",
        arity: Some(2),
        call: random,
    },
];

pub(super) fn find(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

fn int_arg(args: &[Value], index: usize) -> Result<i32, RuntimeError> {
    args[index]
        .as_int()
        .ok_or_else(|| RuntimeError::TypeError("expected a whole number".to_string()))
}

fn text_arg(args: &[Value], index: usize) -> Result<String, RuntimeError> {
    args[index]
        .scalar_text()
        .ok_or_else(|| RuntimeError::TypeError("expected a scalar value".to_string()))
}

// Arguments are concatenated with no separator and the line is terminated.
fn print(interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    for value in &args {
        write!(interpreter.out, "{}", value)?;
    }
    writeln!(interpreter.out)?;
    Ok(Value::Null)
}

fn clear(interpreter: &mut Interpreter, _args: Vec<Value>) -> Result<Value, RuntimeError> {
    interpreter.window.clear();
    Ok(Value::Null)
}

fn present(interpreter: &mut Interpreter, _args: Vec<Value>) -> Result<Value, RuntimeError> {
    interpreter.window.present();
    Ok(Value::Null)
}

fn draw_circle(interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let x = int_arg(&args, 0)?;
    let y = int_arg(&args, 1)?;
    let r = int_arg(&args, 2)?;
    interpreter.window.draw_circle(x, y, r);
    Ok(Value::Null)
}

fn draw_text(interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let x = int_arg(&args, 0)?;
    let y = int_arg(&args, 1)?;
    let text = text_arg(&args, 2)?;
    interpreter.window.draw_text(x, y, &text);
    Ok(Value::Null)
}

fn draw_sprite(interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let path = text_arg(&args, 0)?;
    let x = int_arg(&args, 1)?;
    let y = int_arg(&args, 2)?;
    interpreter.window.draw_sprite(&path, x, y);
    Ok(Value::Null)
}

fn play_sound(interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let path = text_arg(&args, 0)?;
    interpreter.window.play_sound(&path);
    Ok(Value::Null)
}

fn random(_interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let min = int_arg(&args, 0)?;
    let max = int_arg(&args, 1)?;
    if min > max {
        return Err(RuntimeError::TypeError("random: empty range".to_string()));
    }
    let value = rand::thread_rng().gen_range(min..=max);
    Ok(Value::Number(f64::from(value)))
}
