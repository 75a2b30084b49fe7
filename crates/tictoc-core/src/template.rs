//! Message templates for the stop report
//!
//! Templates follow the replacement-field syntax of Python's `str.format`,
//! restricted to the single field `elapsed` (seconds, as a float):
//!
//! ```text
//! Elapsed time is {elapsed:f} seconds.
//! {elapsed:7.3f}
//! {{literal braces}} {elapsed:>+12.4e}
//! ```
//!
//! A format specifier has the shape `[[fill]align][sign][#][0][width][.precision][type]`
//! where `type` is one of `f F e E g G %` or omitted.

use crate::error::FormatError;
use std::fmt;
use std::str::FromStr;

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "Elapsed time is {elapsed:f} seconds.\n";

const FIELD_NAME: &str = "elapsed";
const DEFAULT_PRECISION: usize = 6;

/// A parsed message template
#[derive(Debug, Clone, PartialEq)]
pub struct FormatTemplate {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Elapsed(FormatSpec),
}

impl FormatTemplate {
    /// Parse a template, validating every replacement field
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut field = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(FormatError::invalid_spec(
                                    &field,
                                    "nested replacement fields are not supported",
                                ));
                            }
                            _ => field.push(c),
                        }
                    }
                    if !closed {
                        return Err(FormatError::UnclosedBrace { position });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Elapsed(parse_field(&field)?));
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(FormatError::UnmatchedClosingBrace { position }),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { source: source.to_string(), segments })
    }

    /// Render the template with `elapsed` seconds substituted
    pub fn render(&self, elapsed: f64) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Elapsed(spec) => out.push_str(&spec.apply(elapsed)),
            }
        }
        out
    }

    /// The template text this was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for FormatTemplate {
    fn default() -> Self {
        let spec = FormatSpec { kind: Kind::Fixed, ..FormatSpec::default() };
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Literal("Elapsed time is ".to_string()),
                Segment::Elapsed(spec),
                Segment::Literal(" seconds.\n".to_string()),
            ],
        }
    }
}

impl FromStr for FormatTemplate {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_field(field: &str) -> Result<FormatSpec, FormatError> {
    let (name, spec) = match field.split_once(':') {
        Some((name, spec)) => (name, spec),
        None => (field, ""),
    };

    if name.contains('!') {
        return Err(FormatError::invalid_spec(field, "conversions are not supported"));
    }
    if name != FIELD_NAME {
        return Err(FormatError::UnknownField { name: name.to_string() });
    }

    FormatSpec::parse(spec)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Sign {
    #[default]
    Negative,
    Always,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Kind {
    /// No presentation type: shortest round-trip form
    #[default]
    Repr,
    Fixed,
    FixedUpper,
    Exponent,
    ExponentUpper,
    General,
    GeneralUpper,
    Percent,
}

/// A single parsed format specifier
#[derive(Debug, Clone, PartialEq, Default)]
struct FormatSpec {
    /// Explicit fill character, if one preceded the alignment
    fill: Option<char>,
    align: Option<Align>,
    sign: Sign,
    alternate: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    kind: Kind,
}

impl FormatSpec {
    fn parse(spec: &str) -> Result<Self, FormatError> {
        let chars: Vec<char> = spec.chars().collect();
        let mut parsed = FormatSpec::default();
        let mut i = 0;

        if let Some(align) = chars.get(1).copied().and_then(Align::from_char) {
            parsed.fill = Some(chars[0]);
            parsed.align = Some(align);
            i = 2;
        } else if let Some(align) = chars.first().copied().and_then(Align::from_char) {
            parsed.align = Some(align);
            i = 1;
        }

        match chars.get(i) {
            Some('+') => {
                parsed.sign = Sign::Always;
                i += 1;
            }
            Some('-') => i += 1,
            Some(' ') => {
                parsed.sign = Sign::Space;
                i += 1;
            }
            _ => {}
        }

        if chars.get(i) == Some(&'#') {
            parsed.alternate = true;
            i += 1;
        }

        if chars.get(i) == Some(&'0') {
            parsed.zero_pad = true;
            i += 1;
        }

        let (width, next) = read_number(&chars, i, spec)?;
        parsed.width = width;
        i = next;

        if matches!(chars.get(i), Some(',' | '_')) {
            return Err(FormatError::invalid_spec(spec, "digit grouping is not supported"));
        }

        if chars.get(i) == Some(&'.') {
            let (precision, next) = read_number(&chars, i + 1, spec)?;
            if precision.is_none() {
                return Err(FormatError::invalid_spec(spec, "format specifier missing precision"));
            }
            parsed.precision = precision;
            i = next;
        }

        if let Some(&code) = chars.get(i) {
            parsed.kind = match code {
                'f' => Kind::Fixed,
                'F' => Kind::FixedUpper,
                'e' => Kind::Exponent,
                'E' => Kind::ExponentUpper,
                'g' => Kind::General,
                'G' => Kind::GeneralUpper,
                '%' => Kind::Percent,
                other => {
                    return Err(FormatError::invalid_spec(
                        spec,
                        format!("unknown format code '{other}' for a float"),
                    ));
                }
            };
            i += 1;
        }

        if i != chars.len() {
            return Err(FormatError::invalid_spec(spec, "invalid format specifier"));
        }

        Ok(parsed)
    }

    fn apply(&self, value: f64) -> String {
        let body = self.body(value.abs());
        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else {
            match self.sign {
                Sign::Negative => "",
                Sign::Always => "+",
                Sign::Space => " ",
            }
        };

        let fill = match (self.fill, self.zero_pad) {
            (Some(fill), _) => fill,
            (None, true) => '0',
            (None, false) => ' ',
        };
        let align = match (self.align, self.zero_pad) {
            (Some(align), _) => align,
            (None, true) => Align::AfterSign,
            (None, false) => Align::Right,
        };

        let len = sign.chars().count() + body.chars().count();
        let pad = self.width.unwrap_or(0).saturating_sub(len);
        let padding = |n: usize| fill.to_string().repeat(n);

        match align {
            Align::Left => format!("{sign}{body}{}", padding(pad)),
            Align::Right => format!("{}{sign}{body}", padding(pad)),
            Align::Center => format!("{}{sign}{body}{}", padding(pad / 2), padding(pad - pad / 2)),
            Align::AfterSign => format!("{sign}{}{body}", padding(pad)),
        }
    }

    /// Format a non-negative magnitude without sign or padding
    fn body(&self, value: f64) -> String {
        let upper = matches!(self.kind, Kind::FixedUpper | Kind::ExponentUpper | Kind::GeneralUpper);
        if !value.is_finite() {
            let text = if value.is_nan() { "nan" } else { "inf" };
            let text = if upper { text.to_uppercase() } else { text.to_string() };
            return if self.kind == Kind::Percent { format!("{text}%") } else { text };
        }

        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        let body = match self.kind {
            Kind::Fixed | Kind::FixedUpper => format!("{value:.precision$}"),
            Kind::Exponent | Kind::ExponentUpper => exponent(value, precision, upper),
            Kind::General | Kind::GeneralUpper => general(value, precision, self.alternate, upper),
            Kind::Percent => format!("{:.precision$}%", value * 100.0),
            Kind::Repr => match self.precision {
                Some(precision) => {
                    let text = general(value, precision, self.alternate, false);
                    if text.contains(['.', 'e']) { text } else { format!("{text}.0") }
                }
                None => repr(value),
            },
        };

        if self.alternate && precision == 0 && matches!(self.kind, Kind::Fixed | Kind::FixedUpper)
        {
            format!("{body}.")
        } else {
            body
        }
    }
}

/// Largest width or precision accepted; Rust's runtime format precision is a `u16`
const MAX_WIDTH_OR_PRECISION: usize = u16::MAX as usize;

fn read_number(
    chars: &[char],
    start: usize,
    spec: &str,
) -> Result<(Option<usize>, usize), FormatError> {
    let end = chars[start.min(chars.len())..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(chars.len(), |offset| start + offset);
    if end == start {
        return Ok((None, start));
    }
    let digits: String = chars[start..end].iter().collect();
    let number = digits
        .parse::<usize>()
        .ok()
        .filter(|&n| n <= MAX_WIDTH_OR_PRECISION)
        .ok_or_else(|| FormatError::invalid_spec(spec, "width or precision too large"))?;
    Ok((Some(number), end))
}

/// Split Rust's `{:e}` output into mantissa and exponent
fn split_exponent(text: &str) -> (&str, i32) {
    match text.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or_default()),
        None => (text, 0),
    }
}

/// Exponent suffix with an explicit sign and at least two digits
fn exponent_suffix(exp: i32, upper: bool) -> String {
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{marker}{sign}{:02}", exp.unsigned_abs())
}

fn exponent(value: f64, precision: usize, upper: bool) -> String {
    let text = format!("{value:.precision$e}");
    let (mantissa, exp) = split_exponent(&text);
    format!("{mantissa}{}", exponent_suffix(exp, upper))
}

fn general(value: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let precision = precision.max(1);
    let rounded = format!("{value:.prec$e}", prec = precision - 1);
    let (mantissa, exp) = split_exponent(&rounded);
    let exp = if value == 0.0 { 0 } else { exp };

    if (-4..precision as i32).contains(&exp) {
        let decimals = (precision as i32 - 1 - exp) as usize;
        let text = format!("{value:.decimals$}");
        if alternate { text } else { strip_trailing_zeros(&text).to_string() }
    } else {
        let mantissa = if alternate { mantissa } else { strip_trailing_zeros(mantissa) };
        format!("{mantissa}{}", exponent_suffix(exp, upper))
    }
}

/// Shortest round-trip text, switching to exponent form for very large or small values
fn repr(value: f64) -> String {
    if value != 0.0 && !(1e-4..1e16).contains(&value) {
        let text = format!("{value:e}");
        let (mantissa, exp) = split_exponent(&text);
        return format!("{mantissa}{}", exponent_suffix(exp, false));
    }
    let text = value.to_string();
    if text.contains('.') { text } else { format!("{text}.0") }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') { text.trim_end_matches('0').trim_end_matches('.') } else { text }
}
