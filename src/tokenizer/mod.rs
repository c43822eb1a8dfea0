//! Position-preserving masking of Kotlin/Java source
//!
//! [`mask`] blanks comments and literal text so reference patterns only match
//! real code. Template expressions (`"${getString(R.string.x)}"`) stay
//! visible because they are code. The output has the same byte length as the
//! input and keeps every `\n`/`\r`, so line and column numbers computed on the
//! masked text are valid for the original.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Top-level code
    Code,
    /// Inside `${ ... }`, with the count of unclosed braces
    Template { depth: usize },
    /// `"..."`
    Str,
    /// `"""..."""`
    RawStr,
    /// `'c'`
    Char,
}

/// Mask comments and literals in `source`, keeping template expressions
pub fn mask(source: &str) -> String {
    Masker::new(source).run()
}

struct Masker<'a> {
    src: &'a [u8],
    out: Vec<u8>,
    stack: Vec<Frame>,
    pos: usize,
}

impl<'a> Masker<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            out: source.as_bytes().to_vec(),
            stack: vec![Frame::Code],
            pos: 0,
        }
    }

    fn run(mut self) -> String {
        while self.pos < self.src.len() {
            let frame = self.stack.last().copied().unwrap_or(Frame::Code);
            match frame {
                Frame::Code | Frame::Template { .. } => self.step_code(frame),
                Frame::Str => self.step_quoted(b'"', true),
                Frame::Char => self.step_quoted(b'\'', false),
                Frame::RawStr => self.step_raw(),
            }
        }
        // Only ASCII bytes are ever rewritten, and whole multi-byte sequences
        // are either kept or blanked, so the buffer stays valid UTF-8.
        String::from_utf8_lossy(&self.out).into_owned()
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn starts_with(&self, needle: &[u8]) -> bool {
        self.src[self.pos..].starts_with(needle)
    }

    fn blank(&mut self, from: usize, to: usize) {
        let to = to.min(self.out.len());
        for b in &mut self.out[from..to] {
            if *b != b'\n' && *b != b'\r' {
                *b = b' ';
            }
        }
    }

    fn step_code(&mut self, frame: Frame) {
        let b = self.src[self.pos];
        match b {
            b'/' if self.peek(1) == Some(b'/') => {
                let end = self.src[self.pos..]
                    .iter()
                    .position(|&c| c == b'\n')
                    .map(|n| self.pos + n)
                    .unwrap_or(self.src.len());
                self.blank(self.pos, end);
                self.pos = end;
            }
            b'/' if self.peek(1) == Some(b'*') => {
                let body = self.pos + 2;
                let end = self.src[body..]
                    .windows(2)
                    .position(|w| w == b"*/")
                    .map(|n| body + n + 2)
                    .unwrap_or(self.src.len());
                self.blank(self.pos, end);
                self.pos = end;
            }
            b'"' if self.starts_with(b"\"\"\"") => {
                self.blank(self.pos, self.pos + 3);
                self.stack.push(Frame::RawStr);
                self.pos += 3;
            }
            b'"' => {
                self.blank(self.pos, self.pos + 1);
                self.stack.push(Frame::Str);
                self.pos += 1;
            }
            b'\'' => {
                self.blank(self.pos, self.pos + 1);
                self.stack.push(Frame::Char);
                self.pos += 1;
            }
            b'{' => {
                if let Frame::Template { depth } = frame {
                    self.set_top(Frame::Template { depth: depth + 1 });
                }
                self.pos += 1;
            }
            b'}' => {
                if let Frame::Template { depth } = frame {
                    if depth <= 1 {
                        self.stack.pop();
                    } else {
                        self.set_top(Frame::Template { depth: depth - 1 });
                    }
                }
                self.pos += 1;
            }
            _ => self.pos += 1,
        }
    }

    /// Single-line literal closed by `quote`
    fn step_quoted(&mut self, quote: u8, templates: bool) {
        let b = self.src[self.pos];
        match b {
            b'\\' => {
                let end = (self.pos + 2).min(self.src.len());
                self.blank(self.pos, end);
                self.pos = end;
            }
            b'\n' => {
                // Unterminated on this line
                self.stack.pop();
                self.pos += 1;
            }
            b'$' if templates && self.peek(1) == Some(b'{') => {
                self.stack.push(Frame::Template { depth: 1 });
                self.pos += 2;
            }
            c if c == quote => {
                self.blank(self.pos, self.pos + 1);
                self.stack.pop();
                self.pos += 1;
            }
            _ => {
                self.blank(self.pos, self.pos + 1);
                self.pos += 1;
            }
        }
    }

    fn step_raw(&mut self) {
        if self.starts_with(b"\"\"\"") {
            // A run of more than three quotes closes on its last three
            let run = self.src[self.pos..].iter().take_while(|&&c| c == b'"').count();
            self.blank(self.pos, self.pos + run);
            self.stack.pop();
            self.pos += run;
        } else if self.starts_with(b"${") {
            self.stack.push(Frame::Template { depth: 1 });
            self.pos += 2;
        } else {
            self.blank(self.pos, self.pos + 1);
            self.pos += 1;
        }
    }

    fn set_top(&mut self, frame: Frame) {
        if let Some(top) = self.stack.last_mut() {
            *top = frame;
        }
    }
}
