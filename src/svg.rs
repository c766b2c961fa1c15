//! SVG path data and transform attribute parsing and formatting
//!
//! See [SVG Path Specification](https://www.w3.org/TR/SVG11/paths.html#PathData)
use crate::{ArrayIter, Error, PI, Point, Scalar, Transform, scalar_fmt};
use std::{fmt, str::FromStr};

/// Absolute path command
///
/// Relative commands and shorthand forms (`H`, `V`, `S`, `T`) are resolved by
/// [`PathNormalizer`] before they become a `PathCmd`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    ArcTo {
        radii: Point,
        x_axis_rot: Scalar,
        large: bool,
        sweep: bool,
        dst: Point,
    },
    Close,
}

/// Number of parameters of command `letter`, case insensitive
fn arity(letter: char) -> Option<usize> {
    let arity = match letter.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'C' => 6,
        'S' | 'Q' => 4,
        'A' => 7,
        'Z' => 0,
        _ => return None,
    };
    Some(arity)
}

impl PathCmd {
    /// Build command from an absolute command letter and its parameters
    ///
    /// Accepts `M`, `L`, `C`, `Q`, `A` and `Z`. Arc flags are true when non-zero.
    pub fn from_letter(letter: char, params: &[Scalar]) -> Result<Self, Error> {
        if !matches!(letter, 'M' | 'L' | 'C' | 'Q' | 'A' | 'Z') {
            return Err(Error::UnknownCommand(letter));
        }
        PathNormalizer::new().push(letter, params)
    }

    /// Absolute command letter
    pub fn letter(&self) -> char {
        use PathCmd::*;
        match self {
            MoveTo(_) => 'M',
            LineTo(_) => 'L',
            QuadTo(..) => 'Q',
            CubicTo(..) => 'C',
            ArcTo { .. } => 'A',
            Close => 'Z',
        }
    }

    /// Flat list of command parameters, inverse of [`PathCmd::from_letter`]
    pub fn params(&self) -> Vec<Scalar> {
        use PathCmd::*;
        match *self {
            MoveTo(p) | LineTo(p) => p.0.to_vec(),
            QuadTo(p1, p2) => [p1.0, p2.0].concat(),
            CubicTo(p1, p2, p3) => [p1.0, p2.0, p3.0].concat(),
            ArcTo {
                radii,
                x_axis_rot,
                large,
                sweep,
                dst,
            } => vec![
                radii.x(),
                radii.y(),
                x_axis_rot,
                if large { 1.0 } else { 0.0 },
                if sweep { 1.0 } else { 0.0 },
                dst.x(),
                dst.y(),
            ],
            Close => Vec::new(),
        }
    }

    /// Destination point of the command, `None` for close command
    pub fn dst(&self) -> Option<Point> {
        use PathCmd::*;
        match *self {
            MoveTo(dst) | LineTo(dst) | QuadTo(_, dst) | CubicTo(_, _, dst) => Some(dst),
            ArcTo { dst, .. } => Some(dst),
            Close => None,
        }
    }
}

impl fmt::Display for PathCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PathCmd::*;
        match self {
            MoveTo(p) => write!(f, "M{:?}", p),
            LineTo(p) => write!(f, "L{:?}", p),
            QuadTo(p1, p2) => write!(f, "Q{:?} {:?}", p1, p2),
            CubicTo(p1, p2, p3) => write!(f, "C{:?} {:?} {:?}", p1, p2, p3),
            ArcTo {
                radii,
                x_axis_rot,
                large,
                sweep,
                dst,
            } => {
                write!(f, "A{:?} ", radii)?;
                scalar_fmt(f, *x_axis_rot)?;
                write!(f, " {} {} {:?}", *large as u8, *sweep as u8, dst)
            }
            Close => write!(f, "Z"),
        }
    }
}

/// Resolves relative and shorthand commands into absolute [`PathCmd`]s
///
/// Tracks current position, sub-path start and previous command which are
/// needed to resolve `h`, `S` and friends.
#[derive(Debug, Clone, Default)]
pub struct PathNormalizer {
    // current position from which next relative command will start
    position: Point,
    // current sub-path starting position
    subpath_start: Point,
    // previous command (used to determine smooth points)
    prev: Option<PathCmd>,
}

impl PathNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Resolve single `(letter, params)` pair
    ///
    /// Lowercase letters are relative to the current position.
    pub fn push(&mut self, letter: char, params: &[Scalar]) -> Result<PathCmd, Error> {
        let expected = arity(letter).ok_or(Error::UnknownCommand(letter))?;
        if params.len() != expected {
            return Err(Error::InvalidArity {
                cmd: letter,
                expected,
                found: params.len(),
            });
        }
        let position = self.position;
        let base = if letter.is_ascii_lowercase() {
            position
        } else {
            Point::default()
        };
        let point = |index: usize| Point::new(params[index], params[index + 1]) + base;
        let cmd = match letter.to_ascii_uppercase() {
            'M' => PathCmd::MoveTo(point(0)),
            'L' => PathCmd::LineTo(point(0)),
            'H' => PathCmd::LineTo(Point::new(params[0] + base.x(), position.y())),
            'V' => PathCmd::LineTo(Point::new(position.x(), params[0] + base.y())),
            'C' => PathCmd::CubicTo(point(0), point(2), point(4)),
            'S' => {
                let p1 = match self.prev {
                    Some(PathCmd::CubicTo(_, p2, p3)) => 2.0 * p3 - p2,
                    _ => position,
                };
                PathCmd::CubicTo(p1, point(0), point(2))
            }
            'Q' => PathCmd::QuadTo(point(0), point(2)),
            'T' => {
                let p1 = match self.prev {
                    Some(PathCmd::QuadTo(p1, p2)) => 2.0 * p2 - p1,
                    _ => position,
                };
                PathCmd::QuadTo(p1, point(0))
            }
            'A' => PathCmd::ArcTo {
                radii: Point::new(params[0], params[1]),
                x_axis_rot: params[2],
                large: params[3] != 0.0,
                sweep: params[4] != 0.0,
                dst: point(5),
            },
            _ => PathCmd::Close,
        };
        self.position = match cmd {
            PathCmd::MoveTo(dst) => {
                self.subpath_start = dst;
                dst
            }
            PathCmd::Close => self.subpath_start,
            cmd => cmd.dst().unwrap_or(position),
        };
        self.prev = Some(cmd);
        Ok(cmd)
    }
}

/// Resolve flat `(letter, params)` command list into absolute commands
pub fn normalize_commands<S>(cmds: &[(char, S)]) -> Result<Vec<PathCmd>, Error>
where
    S: AsRef<[Scalar]>,
{
    let mut normalizer = PathNormalizer::new();
    cmds.iter()
        .map(|(letter, params)| normalizer.push(*letter, params.as_ref()))
        .collect()
}

/// Byte level tokenizer shared by path data and transform parsers
struct Parser<'a> {
    // text containing unparsed input
    text: &'a [u8],
    // current offset in the text
    offset: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text: text.as_bytes(),
            offset: 0,
        }
    }

    /// Error construction helper
    fn error<S: Into<String>>(&self, reason: S) -> Error {
        Error::Parse {
            offset: self.offset,
            reason: reason.into(),
        }
    }

    /// Byte at the current position
    fn current(&self) -> Option<u8> {
        self.text.get(self.offset).copied()
    }

    fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// Consume insignificant separators
    fn parse_separators(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n' | b',') = self.current() {
            self.offset += 1;
        }
    }

    /// Consume digits and report whether any were found
    fn parse_digits(&mut self) -> bool {
        let start = self.offset;
        while let Some(b'0'..=b'9') = self.current() {
            self.offset += 1;
        }
        self.offset > start
    }

    /// Consume `+|-` sign
    fn parse_sign(&mut self) {
        if let Some(b'-' | b'+') = self.current() {
            self.offset += 1;
        }
    }

    /// Whether scalar starts after separators
    fn peek_scalar(&mut self) -> bool {
        self.parse_separators();
        matches!(self.current(), Some(b'0'..=b'9' | b'.' | b'-' | b'+'))
    }

    /// Parse single scalar
    fn parse_scalar(&mut self) -> Result<Scalar, Error> {
        self.parse_separators();
        let start = self.offset;
        self.parse_sign();
        let whole = self.parse_digits();
        let fraction = if let Some(b'.') = self.current() {
            self.offset += 1;
            self.parse_digits()
        } else {
            false
        };
        if !whole && !fraction {
            return Err(self.error("failed to parse scalar"));
        }
        if let Some(b'e' | b'E') = self.current() {
            self.offset += 1;
            self.parse_sign();
            if !self.parse_digits() {
                return Err(self.error("failed to parse scalar exponent"));
            }
        }
        lexical_core::parse(&self.text[start..self.offset])
            .map_err(|_| self.error("failed to parse scalar"))
    }

    /// Parse SVG flag `0|1` used by elliptic arc command
    fn parse_flag(&mut self) -> Result<bool, Error> {
        self.parse_separators();
        let flag = match self.current() {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => return Err(self.error("failed to parse flag")),
        };
        self.offset += 1;
        Ok(flag)
    }

    /// Parse identifier consisting of ascii letters
    fn parse_ident(&mut self) -> &'a [u8] {
        let start = self.offset;
        while self.current().is_some_and(|byte| byte.is_ascii_alphabetic()) {
            self.offset += 1;
        }
        &self.text[start..self.offset]
    }

    /// Consume expected byte
    fn expect(&mut self, byte: u8) -> Result<(), Error> {
        self.parse_separators();
        if self.current() == Some(byte) {
            self.offset += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }
}

/// Parse SVG path data into a list of absolute commands
pub fn parse_path(text: &str) -> Result<Vec<PathCmd>, Error> {
    let mut parser = Parser::new(text);
    let mut normalizer = PathNormalizer::new();
    let mut cmds = Vec::new();
    let mut params = Vec::with_capacity(7);
    // letter used for implicitly repeated commands
    let mut repeat: Option<u8> = None;
    loop {
        parser.parse_separators();
        let letter = match parser.current() {
            None => break,
            Some(byte) if arity(byte as char).is_some() => {
                parser.offset += 1;
                byte
            }
            Some(_) => match repeat {
                Some(letter) if parser.peek_scalar() => letter,
                _ => return Err(parser.error("failed to parse path command")),
            },
        };
        repeat = match letter {
            b'M' => Some(b'L'),
            b'm' => Some(b'l'),
            b'Z' | b'z' => None,
            letter => Some(letter),
        };

        params.clear();
        if matches!(letter, b'A' | b'a') {
            for _ in 0..3 {
                params.push(parser.parse_scalar()?);
            }
            for _ in 0..2 {
                params.push(if parser.parse_flag()? { 1.0 } else { 0.0 });
            }
            for _ in 0..2 {
                params.push(parser.parse_scalar()?);
            }
        } else {
            for _ in 0..arity(letter as char).unwrap_or(0) {
                params.push(parser.parse_scalar()?);
            }
        }
        cmds.push(normalizer.push(letter as char, &params)?);
    }
    tracing::trace!(commands = cmds.len(), "path data parsed");
    Ok(cmds)
}

/// Format commands as compact SVG path data
pub fn format_path(cmds: &[PathCmd]) -> String {
    let mut output = String::new();
    for (index, cmd) in cmds.iter().enumerate() {
        if index != 0 {
            output.push(' ');
        }
        output.push_str(&cmd.to_string());
    }
    output
}

/// Parse single transform operation, `None` when the input is exhausted
fn parse_transform(parser: &mut Parser<'_>) -> Result<Option<Transform>, Error> {
    enum Op {
        Matrix,
        Rotate,
        Translate,
        Scale,
        SkewX,
        SkewY,
    }

    parser.parse_separators();
    if parser.is_eof() {
        return Ok(None);
    }
    let op = match parser.parse_ident() {
        b"matrix" => Op::Matrix,
        b"rotate" => Op::Rotate,
        b"translate" => Op::Translate,
        b"scale" => Op::Scale,
        b"skewX" => Op::SkewX,
        b"skewY" => Op::SkewY,
        _ => return Err(parser.error("invalid transform operation")),
    };

    parser.expect(b'(')?;
    let mut args: ArrayIter<[Option<Scalar>; 6]> = ArrayIter::new();
    while parser.peek_scalar() {
        if args.len() == 6 {
            return Err(parser.error("too many transform arguments"));
        }
        args.push(parser.parse_scalar()?);
    }
    parser.expect(b')')?;

    let deg = |value: Scalar| value * PI / 180.0;
    let tr = match (op, args.collect::<Vec<_>>().as_slice()) {
        (Op::Matrix, &[m00, m10, m01, m11, m02, m12]) => {
            Transform::new(m00, m01, m02, m10, m11, m12)
        }
        (Op::Rotate, &[a]) => Transform::new_rotate(deg(a)),
        (Op::Rotate, &[a, cx, cy]) => Transform::identity().rotate_around(deg(a), (cx, cy)),
        (Op::Translate, &[tx]) => Transform::new_translate(tx, 0.0),
        (Op::Translate, &[tx, ty]) => Transform::new_translate(tx, ty),
        (Op::Scale, &[s]) => Transform::new_scale(s, s),
        (Op::Scale, &[sx, sy]) => Transform::new_scale(sx, sy),
        (Op::SkewX, &[ax]) => Transform::new_skew(deg(ax), 0.0),
        (Op::SkewY, &[ay]) => Transform::new_skew(0.0, deg(ay)),
        _ => return Err(parser.error("invalid number of transform arguments")),
    };
    Ok(Some(tr))
}

impl FromStr for Transform {
    type Err = Error;

    /// Parse SVG `transform` attribute, operations are composed left to right
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tr = Transform::identity();
        let mut parser = Parser::new(text);
        while let Some(tr_next) = parse_transform(&mut parser)? {
            tr = tr * tr_next;
        }
        Ok(tr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn assert_point(p0: Point, p1: Point) {
        assert!(p0.dist(p1) < 1e-9, "{:?} != {:?}", p0, p1);
    }

    #[test]
    fn test_parse_scalar() -> Result<(), Error> {
        let mut parser = Parser::new("1 .22e0.32 3.21e-3-1.24 1e4 +5");
        assert_approx_eq!(parser.parse_scalar()?, 1.0);
        assert_approx_eq!(parser.parse_scalar()?, 0.22);
        assert_approx_eq!(parser.parse_scalar()?, 0.32);
        assert_approx_eq!(parser.parse_scalar()?, 3.21e-3);
        assert_approx_eq!(parser.parse_scalar()?, -1.24);
        assert_approx_eq!(parser.parse_scalar()?, 1e4);
        assert_approx_eq!(parser.parse_scalar()?, 5.0);
        assert!(parser.parse_scalar().is_err());

        let mut parser = Parser::new("1e");
        assert!(matches!(
            parser.parse_scalar(),
            Err(Error::Parse { offset: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_parse_path() -> Result<(), Error> {
        let cmds = parse_path("M10,20 l5 5 h5 V0 z m1,1 2,2")?;
        assert_eq!(
            cmds,
            vec![
                PathCmd::MoveTo(Point::new(10.0, 20.0)),
                PathCmd::LineTo(Point::new(15.0, 25.0)),
                PathCmd::LineTo(Point::new(20.0, 25.0)),
                PathCmd::LineTo(Point::new(20.0, 0.0)),
                PathCmd::Close,
                PathCmd::MoveTo(Point::new(11.0, 21.0)),
                PathCmd::LineTo(Point::new(13.0, 23.0)),
            ]
        );

        let cmds = parse_path("M0 0C1 2 3 4 5 6s7 8 9 10Q1 1 2 0t4 0")?;
        assert_eq!(
            cmds[2],
            PathCmd::CubicTo(
                Point::new(7.0, 8.0),
                Point::new(12.0, 14.0),
                Point::new(14.0, 16.0)
            )
        );
        assert_eq!(
            cmds[4],
            PathCmd::QuadTo(Point::new(3.0, -1.0), Point::new(6.0, 0.0))
        );

        let cmds = parse_path("M0,0 a5,5 30 1,0 10,0 A1 2 0 0110 10")?;
        assert_eq!(
            cmds[1],
            PathCmd::ArcTo {
                radii: Point::new(5.0, 5.0),
                x_axis_rot: 30.0,
                large: true,
                sweep: false,
                dst: Point::new(10.0, 0.0),
            }
        );
        assert_eq!(
            cmds[2],
            PathCmd::ArcTo {
                radii: Point::new(1.0, 2.0),
                x_axis_rot: 0.0,
                large: false,
                sweep: true,
                dst: Point::new(10.0, 10.0),
            }
        );

        assert!(parse_path("")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_path_errors() {
        assert!(matches!(
            parse_path("M 0,0 L 1"),
            Err(Error::Parse { offset: 9, .. })
        ));
        assert!(matches!(
            parse_path("M 0,0 X 1,1"),
            Err(Error::Parse { offset: 6, .. })
        ));
        // numbers after close require explicit command
        assert!(parse_path("M 0,0 L 1,1 Z 2,2").is_err());
        assert!(parse_path("M 0,0 A 1,1 0 2,0 3,3").is_err());
    }

    #[test]
    fn test_normalizer() -> Result<(), Error> {
        let cmds = normalize_commands(&[
            ('M', vec![1.0, 1.0]),
            ('h', vec![2.0]),
            ('v', vec![3.0]),
            ('Z', vec![]),
            ('l', vec![1.0, 0.0]),
        ])?;
        assert_eq!(cmds[1], PathCmd::LineTo(Point::new(3.0, 1.0)));
        assert_eq!(cmds[2], PathCmd::LineTo(Point::new(3.0, 4.0)));
        // relative to the sub-path start after close
        assert_eq!(cmds[4], PathCmd::LineTo(Point::new(2.0, 1.0)));

        assert!(matches!(
            normalize_commands(&[('M', vec![1.0])]),
            Err(Error::InvalidArity {
                cmd: 'M',
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            normalize_commands(&[('K', vec![1.0])]),
            Err(Error::UnknownCommand('K'))
        ));
        Ok(())
    }

    #[test]
    fn test_letter_params() -> Result<(), Error> {
        let cmds = parse_path("M1,2 L3,4 C1,2 3,4 5,6 Q1,1 2,2 A3,4 15 1 0 7,8 Z")?;
        for cmd in cmds {
            assert_eq!(PathCmd::from_letter(cmd.letter(), &cmd.params())?, cmd);
        }
        assert!(matches!(
            PathCmd::from_letter('H', &[1.0]),
            Err(Error::UnknownCommand('H'))
        ));
        assert!(matches!(
            PathCmd::from_letter('C', &[1.0, 2.0]),
            Err(Error::InvalidArity { cmd: 'C', .. })
        ));
        Ok(())
    }

    #[test]
    fn test_format_path() -> Result<(), Error> {
        let text = "M0,0 C1,2 3,4.5 -5,6 L10,0 A5,5 30 1 0 10,0 Z";
        let cmds = parse_path(text)?;
        assert_eq!(format_path(&cmds), text);
        assert_eq!(parse_path(&format_path(&cmds))?, cmds);

        // fractional and large coordinates are preserved exactly
        let cmds = parse_path(
            "M12345.678,0.000123456 C20000.5,1 30000.25,2 40000.125,3 \
             Q-0.1,1e-7 98765.4321,-2.5 A1234.5,0.75 12.25 0 1 -1e6,3.3333333333",
        )?;
        assert_eq!(parse_path(&format_path(&cmds))?, cmds);

        let tr = Transform::new_translate(12345.678, 0.000123456).rotate(0.1);
        assert_eq!(Transform::from_str(&tr.to_string())?, tr);
        Ok(())
    }

    #[test]
    fn test_parse_transform() -> Result<(), Error> {
        let tr_str = r#"
            translate(1 2)
            skewX(30)
            matrix(1  2 3 4 -3-7)
            scale(2,1)
            rotate(10 1 2)
            rotate(57.29577951308232)
        "#;
        let tr = Transform::from_str(tr_str)?;
        let expected = Transform::new_translate(1.0, 2.0)
            * Transform::new_skew(PI / 6.0, 0.0)
            * Transform::new(1.0, 3.0, -3.0, 2.0, 4.0, -7.0)
            * Transform::new_scale(2.0, 1.0)
            * Transform::new_translate(1.0, 2.0)
            * Transform::new_rotate(PI / 18.0)
            * Transform::new_translate(-1.0, -2.0)
            * Transform::new_rotate(1.0);
        for p in [Point::new(0.0, 0.0), Point::new(3.0, -7.0)] {
            assert_point(tr.apply(p), expected.apply(p));
        }

        // formatted transform parses back
        let tr_fmt = tr.to_string();
        let tr_back = Transform::from_str(&tr_fmt)?;
        for p in [Point::new(0.0, 0.0), Point::new(3.0, -7.0)] {
            assert!(tr_back.apply(p).dist(tr.apply(p)) < 1e-9);
        }

        // rotation around a point keeps it in place
        let tr = Transform::from_str("rotate(90, 5, 5)")?;
        assert_point(tr.apply(Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
        assert_point(tr.apply(Point::new(6.0, 5.0)), Point::new(5.0, 6.0));

        assert_eq!(Transform::from_str("")?, Transform::identity());
        assert_eq!(Transform::from_str(" \n ")?, Transform::identity());
        assert_eq!(Transform::from_str("scale(2)")?, Transform::new_scale(2.0, 2.0));
        assert_eq!(
            Transform::from_str("translate(4)")?,
            Transform::new_translate(4.0, 0.0)
        );
        Ok(())
    }

    #[test]
    fn test_parse_transform_errors() {
        assert!(Transform::from_str("shear(1)").is_err());
        assert!(Transform::from_str("scale(1,2,3)").is_err());
        assert!(Transform::from_str("matrix(1,2,3,4,5,6,7)").is_err());
        assert!(Transform::from_str("translate(1 2").is_err());
        assert!(Transform::from_str("rotate()").is_err());
    }
}
