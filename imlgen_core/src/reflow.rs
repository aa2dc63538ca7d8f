//! Line based re-indentation of generated documents.
//!
//! The reflower does not parse XML. It looks at one trimmed line at a time
//! and moves a single depth counter that is shared by the whole document:
//!
//! | line                              | emitted at      | depth afterwards |
//! | --------------------------------- | --------------- | ---------------- |
//! | starts with `<?`                  | current         | unchanged        |
//! | contains no `<` (text)            | current + 1     | current + 1      |
//! | contains `/>`                     | current         | unchanged        |
//! | first `<` begins a `</`           | current - 1     | current - 1      |
//! | contains no `</` (opening tag)    | current         | current + 1      |
//! | anything else (`<a>x</a>`)        | current         | unchanged        |
//!
//! Generated files only ever put a single tag on a line, which is the shape
//! this table is correct for. Lines with several tags, or tags spanning
//! lines, come out with odd indentation but never fail.

const INDENT: char = '\t';

/// How a trimmed line moves the depth counter.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum LineKind {
	Declaration,
	Text,
	SelfClosing,
	Closing,
	Opening,
	Inline,
}

impl LineKind {
	fn classify(line: &str) -> Self {
		if line.starts_with("<?") {
			return Self::Declaration;
		}

		let Some(first_open) = line.find('<') else {
			return Self::Text;
		};

		if line.contains("/>") {
			return Self::SelfClosing;
		}

		match line.find("</") {
			Some(first_close) if first_close == first_open => Self::Closing,
			Some(_) => Self::Inline,
			None => Self::Opening,
		}
	}
}

/// Re-indent `content` with tabs. Blank lines are removed and the result has
/// no trailing newline.
pub fn reflow(content: &str) -> String {
	let mut indent: isize = 0;
	let mut lines = Vec::new();

	for line in content.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
		let emit_at = match LineKind::classify(line) {
			LineKind::Declaration | LineKind::SelfClosing | LineKind::Inline => indent,
			LineKind::Text => {
				indent += 1;
				indent
			}
			LineKind::Closing => {
				indent -= 1;
				indent
			}
			LineKind::Opening => {
				indent += 1;
				indent - 1
			}
		};

		lines.push(indented(line, emit_at));
	}

	lines.join("\n")
}

fn indented(line: &str, depth: isize) -> String {
	let depth = usize::try_from(depth).unwrap_or(0);
	let mut out = String::with_capacity(depth + line.len());
	out.extend(std::iter::repeat_n(INDENT, depth));
	out.push_str(line);
	out
}
