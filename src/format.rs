//! printf-style message rendering.
//!
//! Templates use `%` verbs: `%v %s %q %d %b %o %O %x %X %c %U %e %E %f %F
//! %g %G %t %T %%`, with the flags `-+ #0`, a width and a precision. Width
//! and precision may be `*`, taking the value from the next integer argument.
//!
//! Arguments travel as an [`Arg`] slice, so the renderer dispatches on a
//! small closed set of kinds instead of reflecting over values. Everything is
//! appended straight into the caller's buffer; numbers and `Display` values
//! are formatted in place and padded by shifting bytes, so a warm buffer
//! never needs a heap allocation.
//!
//! Mistakes in a template never panic. They show up inline:
//!
//! | Problem                   | Output                   |
//! |---------------------------|--------------------------|
//! | wrong kind for the verb   | `%!d(&str=hello)`        |
//! | too few arguments         | `%!d(MISSING)`           |
//! | too many arguments        | `%!(EXTRA i64=1, &str=x)`|
//! | `%` at end of template    | `%!(NOVERB)`             |
//! | bad `*` width / precision | `%!(BADWIDTH)` / `%!(BADPREC)` |
//! | `Display` returned `Err`  | `%!s(ERROR)`             |

use std::any::type_name;
use std::fmt::{self, Write as _};

const BAD_WIDTH: &[u8] = b"%!(BADWIDTH)";
const BAD_PREC: &[u8] = b"%!(BADPREC)";
const NO_VERB: &[u8] = b"%!(NOVERB)";

/// Widths above this are rejected rather than honoured.
const MAX_WIDTH: usize = 1_000_000;

/// Precisions above this are rejected; `core::fmt` cannot take a larger one.
const MAX_PRECISION: usize = u16::MAX as usize;

const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";
const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// One argument to a formatted log call.
///
/// Build these with [`ToArg`] (what the `infof!` family of macros does) or
/// wrap arbitrary values with [`Arg::display`] / [`Arg::debug`].
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    Str(&'a str),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// A value rendered through its `Display` impl, with its type name.
    Display(&'a dyn fmt::Display, &'static str),
    /// A value rendered through its `Debug` impl, with its type name.
    Debug(&'a dyn fmt::Debug, &'static str),
}

impl<'a> Arg<'a> {
    pub fn display<T: fmt::Display>(value: &'a T) -> Self {
        Arg::Display(value, type_name::<T>())
    }

    pub fn debug<T: fmt::Debug>(value: &'a T) -> Self {
        Arg::Debug(value, type_name::<T>())
    }

    /// Name printed by `%T` and inside error markers.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Str(_) => "&str",
            Arg::Int(_) => "i64",
            Arg::Uint(_) => "u64",
            Arg::Float(_) => "f64",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Display(_, name) | Arg::Debug(_, name) => name,
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Arg::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Arg::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Arg::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Arg::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Arg::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Arg::Display(_, name) => f.debug_tuple("Display").field(name).finish(),
            Arg::Debug(_, name) => f.debug_tuple("Debug").field(name).finish(),
        }
    }
}

/// Conversion into an [`Arg`] borrowing from `self`.
pub trait ToArg {
    fn to_arg(&self) -> Arg<'_>;
}

impl ToArg for str {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl ToArg for String {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl ToArg for Arg<'_> {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        *self
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        (**self).to_arg()
    }
}

macro_rules! impl_to_arg {
    ($variant:ident as $wide:ty: $($t:ty),*) => {$(
        impl ToArg for $t {
            #[inline]
            fn to_arg(&self) -> Arg<'_> {
                Arg::$variant(*self as $wide)
            }
        }
    )*};
}

impl_to_arg!(Int as i64: i8, i16, i32, i64, isize);
impl_to_arg!(Uint as u64: u8, u16, u32, u64, usize);
impl_to_arg!(Float as f64: f64);

impl ToArg for f32 {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Float(widen_f32(*self))
    }
}

impl ToArg for bool {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Bool(*self)
    }
}

impl ToArg for char {
    #[inline]
    fn to_arg(&self) -> Arg<'_> {
        Arg::Char(*self)
    }
}

impl<'a, T: ToArg + ?Sized> From<&'a T> for Arg<'a> {
    fn from(value: &'a T) -> Self {
        value.to_arg()
    }
}

/// Widens an `f32` to the `f64` with the same shortest decimal form, so
/// `10.1f32` prints as `10.1` rather than `10.100000381469727`.
fn widen_f32(value: f32) -> f64 {
    if !value.is_finite() {
        return f64::from(value);
    }
    let mut buf = StackBuf::<48>::new();
    if write!(buf, "{:e}", value).is_err() {
        return f64::from(value);
    }
    buf.as_str().parse().unwrap_or(f64::from(value))
}

/// Appends `format` rendered with `args` to `out`.
pub fn render(out: &mut Vec<u8>, format: &str, args: &[Arg<'_>]) {
    let bytes = format.as_bytes();
    let end = bytes.len();
    let mut i = 0;
    let mut arg_num = 0;

    while i < end {
        let literal = i;
        while i < end && bytes[i] != b'%' {
            i += 1;
        }
        out.extend_from_slice(&bytes[literal..i]);
        if i >= end {
            break;
        }
        i += 1;

        let mut spec = Spec::default();
        while i < end {
            match bytes[i] {
                b'-' => {
                    spec.minus = true;
                    spec.zero = false;
                }
                b'+' => spec.plus = true,
                b' ' => spec.space = true,
                b'0' => spec.zero = !spec.minus,
                b'#' => spec.sharp = true,
                _ => break,
            }
            i += 1;
        }

        if i < end && bytes[i] == b'*' {
            i += 1;
            match int_from_arg(args, &mut arg_num) {
                Some(width) => {
                    if width < 0 {
                        spec.minus = true;
                        spec.zero = false;
                    }
                    spec.width = Some(width.unsigned_abs() as usize);
                }
                None => out.extend_from_slice(BAD_WIDTH),
            }
        } else {
            let (width, next) = parse_num(bytes, i);
            i = next;
            match width {
                Ok(width) => spec.width = width,
                Err(()) => out.extend_from_slice(BAD_WIDTH),
            }
        }

        if i < end && bytes[i] == b'.' {
            i += 1;
            if i < end && bytes[i] == b'*' {
                i += 1;
                match int_from_arg(args, &mut arg_num) {
                    Some(prec) if (0..=MAX_PRECISION as i64).contains(&prec) => {
                        spec.precision = Some(prec as usize)
                    }
                    // a negative precision means none
                    Some(prec) if prec < 0 => {}
                    _ => out.extend_from_slice(BAD_PREC),
                }
            } else {
                let (prec, next) = parse_num(bytes, i);
                i = next;
                match prec {
                    Ok(Some(prec)) if prec > MAX_PRECISION => out.extend_from_slice(BAD_PREC),
                    Ok(prec) => spec.precision = Some(prec.unwrap_or(0)),
                    Err(()) => out.extend_from_slice(BAD_PREC),
                }
            }
        }

        // only ASCII has been consumed since the '%', so `i` is a char boundary
        let Some(verb) = format[i..].chars().next() else {
            out.extend_from_slice(NO_VERB);
            break;
        };
        i += verb.len_utf8();

        if verb == '%' {
            out.push(b'%');
        } else if let Some(&arg) = args.get(arg_num) {
            arg_num += 1;
            write_arg(out, arg, verb, spec);
        } else {
            out.extend_from_slice(b"%!");
            push_char(out, verb);
            out.extend_from_slice(b"(MISSING)");
        }
    }

    if arg_num < args.len() {
        out.extend_from_slice(b"%!(EXTRA ");
        for (k, &arg) in args[arg_num..].iter().enumerate() {
            if k > 0 {
                out.extend_from_slice(b", ");
            }
            out.extend_from_slice(arg.type_name().as_bytes());
            out.push(b'=');
            write_arg(out, arg, 'v', Spec::default());
        }
        out.push(b')');
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    space: bool,
    zero: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Parses decimal digits at `i`. `Ok(None)` when there are none, `Err` when
/// the number is unreasonably large.
fn parse_num(bytes: &[u8], mut i: usize) -> (Result<Option<usize>, ()>, usize) {
    let start = i;
    let mut value: usize = 0;
    let mut too_large = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = value * 10 + usize::from(bytes[i] - b'0');
        if value > MAX_WIDTH {
            too_large = true;
            value = MAX_WIDTH;
        }
        i += 1;
    }
    if too_large {
        (Err(()), i)
    } else if i == start {
        (Ok(None), i)
    } else {
        (Ok(Some(value)), i)
    }
}

/// Consumes the next argument as a `*` width or precision.
fn int_from_arg(args: &[Arg<'_>], arg_num: &mut usize) -> Option<i64> {
    let arg = args.get(*arg_num)?;
    *arg_num += 1;
    let value = match *arg {
        Arg::Int(v) => v,
        Arg::Uint(v) => i64::try_from(v).ok()?,
        _ => return None,
    };
    (value.unsigned_abs() <= MAX_WIDTH as u64).then_some(value)
}

fn write_arg(out: &mut Vec<u8>, arg: Arg<'_>, verb: char, spec: Spec) {
    if verb == 'T' {
        let start = out.len();
        out.extend_from_slice(arg.type_name().as_bytes());
        pad(out, start, &spec, None);
        return;
    }
    if verb == 'v' && spec.sharp {
        write_debug_form(out, arg, spec);
        return;
    }

    let handled = match arg {
        Arg::Str(s) => write_str(out, s, verb, spec),
        Arg::Int(v) => write_int(out, v < 0, v.unsigned_abs(), verb, spec),
        Arg::Uint(v) => write_int(out, false, v, verb, spec),
        Arg::Float(v) => write_float(out, v, verb, spec),
        Arg::Bool(v) => write_bool(out, v, verb, spec),
        Arg::Char(c) => write_char(out, c, verb, spec),
        Arg::Display(d, _) => write_with(out, verb, spec, |w| write!(w, "{}", d)),
        Arg::Debug(d, _) => write_with(out, verb, spec, |w| write!(w, "{:?}", d)),
    };

    if !handled {
        out.extend_from_slice(b"%!");
        push_char(out, verb);
        out.push(b'(');
        out.extend_from_slice(arg.type_name().as_bytes());
        out.push(b'=');
        write_arg(out, arg, 'v', Spec::default());
        out.push(b')');
    }
}

fn write_str(out: &mut Vec<u8>, s: &str, verb: char, spec: Spec) -> bool {
    let start = out.len();
    match verb {
        's' | 'v' => out.extend_from_slice(truncate_str(s, spec.precision).as_bytes()),
        'q' => {
            out.extend_from_slice(truncate_str(s, spec.precision).as_bytes());
            quote_in_place(out, start, spec.sharp);
        }
        'x' | 'X' => {
            let digits = if verb == 'X' { UPPER_DIGITS } else { LOWER_DIGITS };
            let bytes = match spec.precision {
                Some(p) => &s.as_bytes()[..p.min(s.len())],
                None => s.as_bytes(),
            };
            for (k, &b) in bytes.iter().enumerate() {
                if spec.space && k > 0 {
                    out.push(b' ');
                }
                if spec.sharp && (spec.space || k == 0) {
                    out.extend_from_slice(if verb == 'X' { b"0X" } else { b"0x" });
                }
                out.push(digits[usize::from(b >> 4)]);
                out.push(digits[usize::from(b & 0x0f)]);
            }
        }
        _ => return false,
    }
    pad(out, start, &spec, None);
    true
}

fn write_int(out: &mut Vec<u8>, negative: bool, magnitude: u64, verb: char, spec: Spec) -> bool {
    let start = out.len();
    let (base, digits): (u64, &[u8; 16]) = match verb {
        'd' | 'v' => (10, LOWER_DIGITS),
        'b' => (2, LOWER_DIGITS),
        'o' | 'O' => (8, LOWER_DIGITS),
        'x' => (16, LOWER_DIGITS),
        'X' => (16, UPPER_DIGITS),
        'c' => {
            push_char(out, char_from(negative, magnitude));
            pad(out, start, &spec, None);
            return true;
        }
        'q' => {
            let _ = emit(out, format_args!("{:?}", char_from(negative, magnitude)));
            pad(out, start, &spec, None);
            return true;
        }
        'U' => {
            let _ = emit(out, format_args!("U+{:04X}", magnitude));
            if spec.sharp {
                let _ = emit(out, format_args!(" '{}'", char_from(negative, magnitude)));
            }
            pad(out, start, &spec, None);
            return true;
        }
        _ => return false,
    };

    let mut buf = [0u8; 64];
    let mut pos = buf.len();
    if !(magnitude == 0 && spec.precision == Some(0)) {
        let mut m = magnitude;
        loop {
            pos -= 1;
            buf[pos] = digits[(m % base) as usize];
            m /= base;
            if m == 0 {
                break;
            }
        }
    }
    let number = &buf[pos..];

    if negative {
        out.push(b'-');
    } else if spec.plus {
        out.push(b'+');
    } else if spec.space {
        out.push(b' ');
    }
    match verb {
        'x' if spec.sharp => out.extend_from_slice(b"0x"),
        'X' if spec.sharp => out.extend_from_slice(b"0X"),
        'b' if spec.sharp => out.extend_from_slice(b"0b"),
        'o' if spec.sharp && number.first() != Some(&b'0') => out.push(b'0'),
        'O' => out.extend_from_slice(b"0o"),
        _ => {}
    }
    let body = out.len();
    if let Some(precision) = spec.precision {
        for _ in number.len()..precision {
            out.push(b'0');
        }
    }
    out.extend_from_slice(number);

    // an explicit precision already fixed the digit count
    let zero_at = spec.precision.is_none().then_some(body);
    pad(out, start, &spec, zero_at);
    true
}

fn write_float(out: &mut Vec<u8>, value: f64, verb: char, spec: Spec) -> bool {
    if !matches!(verb, 'v' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G') {
        return false;
    }
    let start = out.len();

    if value.is_nan() {
        if spec.plus {
            out.push(b'+');
        } else if spec.space {
            out.push(b' ');
        }
        out.extend_from_slice(b"NaN");
        pad(out, start, &spec, None);
        return true;
    }

    if value.is_sign_negative() {
        out.push(b'-');
    } else if spec.plus || value.is_infinite() {
        out.push(b'+');
    } else if spec.space {
        out.push(b' ');
    }
    if value.is_infinite() {
        out.extend_from_slice(b"Inf");
        pad(out, start, &spec, None);
        return true;
    }

    let abs = value.abs();
    let body = out.len();
    let upper = matches!(verb, 'E' | 'G');
    match verb {
        'f' | 'F' => {
            let _ = emit(out, format_args!("{:.*}", spec.precision.unwrap_or(6), abs));
        }
        'e' | 'E' => {
            let _ = emit(out, format_args!("{:.*e}", spec.precision.unwrap_or(6), abs));
            let (epos, exp) = split_exponent(out, body);
            out.truncate(epos);
            push_exponent(out, exp, upper);
        }
        _ => write_general(out, body, abs, spec.precision, upper, spec.sharp),
    }
    pad(out, start, &spec, Some(body));
    true
}

/// `%g`: exponent form for very large or small magnitudes, plain decimals
/// otherwise, both without trailing zeros.
fn write_general(
    out: &mut Vec<u8>,
    body: usize,
    abs: f64,
    precision: Option<usize>,
    upper: bool,
    sharp: bool,
) {
    match precision {
        None => {
            // shortest digits that round-trip
            let _ = emit(out, format_args!("{:e}", abs));
            let (epos, exp) = split_exponent(out, body);
            if !(-4..6).contains(&exp) {
                out.truncate(epos);
                push_exponent(out, exp, upper);
            } else {
                out.truncate(body);
                let _ = emit(out, format_args!("{}", abs));
            }
        }
        Some(precision) => {
            let precision = precision.max(1);
            let _ = emit(out, format_args!("{:.*e}", precision - 1, abs));
            let (epos, exp) = split_exponent(out, body);
            if exp < -4 || exp >= precision as i32 {
                out.truncate(epos);
                if !sharp {
                    trim_fraction_zeros(out, body);
                }
                push_exponent(out, exp, upper);
            } else {
                out.truncate(body);
                let decimals = ((precision as i32 - 1 - exp) as usize).min(MAX_PRECISION);
                let _ = emit(out, format_args!("{:.*}", decimals, abs));
                if !sharp {
                    trim_fraction_zeros(out, body);
                }
            }
        }
    }
}

fn write_bool(out: &mut Vec<u8>, value: bool, verb: char, spec: Spec) -> bool {
    if !matches!(verb, 't' | 'v') {
        return false;
    }
    let start = out.len();
    out.extend_from_slice(if value { b"true" } else { b"false" });
    pad(out, start, &spec, None);
    true
}

fn write_char(out: &mut Vec<u8>, c: char, verb: char, spec: Spec) -> bool {
    match verb {
        'c' | 'v' | 's' => {
            let start = out.len();
            push_char(out, c);
            pad(out, start, &spec, None);
            true
        }
        _ => write_int(out, false, u64::from(c), verb, spec),
    }
}

/// `%v`, `%s` and `%q` for values rendered through `core::fmt`.
fn write_with<F>(out: &mut Vec<u8>, verb: char, spec: Spec, render: F) -> bool
where
    F: FnOnce(&mut ByteWriter<'_>) -> fmt::Result,
{
    if !matches!(verb, 'v' | 's' | 'q') {
        return false;
    }
    let start = out.len();
    if render(&mut ByteWriter(out)).is_err() {
        out.truncate(start);
        out.extend_from_slice(b"%!");
        push_char(out, verb);
        out.extend_from_slice(b"(ERROR)");
        return true;
    }
    truncate_chars(out, start, spec.precision);
    if verb == 'q' {
        quote_in_place(out, start, spec.sharp);
    }
    pad(out, start, &spec, None);
    true
}

/// `%#v`: the Rust `Debug` form of the argument.
fn write_debug_form(out: &mut Vec<u8>, arg: Arg<'_>, spec: Spec) {
    let start = out.len();
    let result = match arg {
        Arg::Str(s) => emit(out, format_args!("{:?}", s)),
        Arg::Int(v) => emit(out, format_args!("{:?}", v)),
        Arg::Uint(v) => emit(out, format_args!("{:?}", v)),
        Arg::Float(v) => emit(out, format_args!("{:?}", v)),
        Arg::Bool(v) => emit(out, format_args!("{:?}", v)),
        Arg::Char(v) => emit(out, format_args!("{:?}", v)),
        Arg::Display(d, _) => emit(out, format_args!("{}", d)),
        Arg::Debug(d, _) => emit(out, format_args!("{:#?}", d)),
    };
    if result.is_err() {
        out.truncate(start);
        out.extend_from_slice(b"%!v(ERROR)");
        return;
    }
    pad(out, start, &spec, None);
}

/// Pads `out[start..]` to `spec.width`, counted in chars.
///
/// `zero_at` is where zeros go when zero padding applies (after any sign or
/// radix prefix); `None` means the value never takes zero padding.
fn pad(out: &mut Vec<u8>, start: usize, spec: &Spec, zero_at: Option<usize>) {
    let Some(width) = spec.width else {
        return;
    };
    let len = char_count(&out[start..]);
    if len >= width {
        return;
    }
    let fill = width - len;
    if spec.minus {
        out.resize(out.len() + fill, b' ');
        return;
    }
    let (at, byte) = match zero_at {
        Some(at) if spec.zero => (at, b'0'),
        _ => (start, b' '),
    };
    let old_len = out.len();
    out.resize(old_len + fill, byte);
    out.copy_within(at..old_len, at + fill);
    out[at..at + fill].fill(byte);
}

#[inline]
fn char_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xC0 != 0x80).count()
}

fn truncate_str(s: &str, precision: Option<usize>) -> &str {
    match precision.and_then(|p| s.char_indices().nth(p)) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Keeps at most `precision` chars of `out[start..]`.
fn truncate_chars(out: &mut Vec<u8>, start: usize, precision: Option<usize>) {
    let Some(precision) = precision else {
        return;
    };
    let mut seen = 0;
    for idx in start..out.len() {
        if out[idx] & 0xC0 != 0x80 {
            if seen == precision {
                out.truncate(idx);
                return;
            }
            seen += 1;
        }
    }
}

/// Rewrites `out[start..]` as a quoted string literal.
///
/// With `raw` the text is wrapped in backquotes when it has nothing that
/// would need escaping.
fn quote_in_place(out: &mut Vec<u8>, start: usize, raw: bool) {
    let end = out.len();
    if raw
        && out[start..]
            .iter()
            .all(|&b| b != b'`' && b != 0x7f && (b >= 0x20 || b == b'\t'))
    {
        out.insert(start, b'`');
        out.push(b'`');
        return;
    }

    out.push(b'"');
    for idx in start..end {
        let b = out[idx];
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b if b < 0x20 || b == 0x7f => {
                out.extend_from_slice(b"\\x");
                out.push(LOWER_DIGITS[usize::from(b >> 4)]);
                out.push(LOWER_DIGITS[usize::from(b & 0x0f)]);
            }
            b => out.push(b),
        }
    }
    out.push(b'"');
    out.copy_within(end.., start);
    out.truncate(out.len() - (end - start));
}

/// Locates the `e` written by `{:e}` in `out[from..]` and parses the exponent.
fn split_exponent(out: &[u8], from: usize) -> (usize, i32) {
    let Some(rel) = out[from..].iter().rposition(|&b| b == b'e') else {
        return (out.len(), 0);
    };
    let epos = from + rel;
    let mut exp: i32 = 0;
    let mut negative = false;
    for &b in &out[epos + 1..] {
        match b {
            b'-' => negative = true,
            b'0'..=b'9' => exp = exp * 10 + i32::from(b - b'0'),
            _ => {}
        }
    }
    (epos, if negative { -exp } else { exp })
}

/// Appends `e+06` style exponents: explicit sign, at least two digits.
fn push_exponent(out: &mut Vec<u8>, exp: i32, upper: bool) {
    out.push(if upper { b'E' } else { b'e' });
    let _ = emit(out, format_args!("{:+03}", exp));
}

fn trim_fraction_zeros(out: &mut Vec<u8>, from: usize) {
    if !out[from..].contains(&b'.') {
        return;
    }
    while out.last() == Some(&b'0') {
        out.pop();
    }
    if out.last() == Some(&b'.') {
        out.pop();
    }
}

fn char_from(negative: bool, magnitude: u64) -> char {
    if negative {
        return char::REPLACEMENT_CHARACTER;
    }
    u32::try_from(magnitude)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[inline]
fn push_char(out: &mut Vec<u8>, c: char) {
    let mut utf8 = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
}

#[inline]
fn emit(out: &mut Vec<u8>, args: fmt::Arguments<'_>) -> fmt::Result {
    ByteWriter(out).write_fmt(args)
}

/// `fmt::Write` over a byte buffer.
pub(crate) struct ByteWriter<'a>(pub(crate) &'a mut Vec<u8>);

impl fmt::Write for ByteWriter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Fixed-size `fmt::Write` target for short scratch renders.
struct StackBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> StackBuf<N> {
    const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    fn as_str(&self) -> &str {
        // only whole `&str`s are ever copied in
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

impl<const N: usize> fmt::Write for StackBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > N {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}
