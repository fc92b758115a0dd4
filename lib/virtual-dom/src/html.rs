use indexmap::IndexMap;

/// Attributes of an element in the order they were written
pub type Attributes = IndexMap<String, String>;

/// Owned intermediate representation of html, used for parsing templates, comparing trees and
/// storing rendered output
#[derive(Debug, Clone, PartialEq)]
pub enum Html {
    Comment {
        text: String,
    },
    Text {
        text: String,
    },
    Element {
        tag: String,
        attributes: Attributes,
        children: Vec<Html>,
    },
}

/// A "simple" html parser. This is a fairly simplified way of parsing html ignoring a lot of
/// edge cases and validation normally seen when parsing html.
///
/// Text that only consists of spaces and newlines is dropped and adjacent text is merged.
pub fn parse_html(input: &str) -> Vec<Html> {
    let mut cursor = Cursor::new(input);
    let mut tokens: Vec<Html> = vec![];

    while let Some(token) = read_token(&mut cursor) {
        if let (Some(Html::Text { text: a }), Html::Text { text: b }) = (tokens.last_mut(), &token)
        {
            a.push_str(b);
            continue;
        }
        tokens.push(token)
    }

    tokens
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn consume(&mut self, n: usize) -> &'a str {
        let consumed = &self.input[self.pos..self.pos + n];
        self.pos += n;
        consumed
    }

    /// consume until (not including) `c` or until the end of input
    fn consume_until(&mut self, c: char) -> &'a str {
        let n = self.rest().find(c).unwrap_or(self.rest().len());
        self.consume(n)
    }
}

fn read_token(cursor: &mut Cursor) -> Option<Html> {
    while !cursor.rest().is_empty() {
        if cursor.rest().starts_with('<') {
            if let Some(comment) = comment(cursor) {
                return Some(comment);
            }

            if let Some(element) = element(cursor) {
                return Some(element);
            }

            // non html opening
            let mut text = cursor.consume(1).to_string();
            text.push_str(cursor.consume_until('<'));
            return Some(Html::Text { text });
        }

        let text = cursor.consume_until('<');
        if text.chars().any(|c| c != ' ' && c != '\n') {
            return Some(Html::Text {
                text: text.to_string(),
            });
        }
    }

    None
}

fn comment(cursor: &mut Cursor) -> Option<Html> {
    let rest = cursor.rest().strip_prefix("<!--")?;
    let end = rest.find("-->")?;
    let text = rest[..end].to_string();
    cursor.consume(4 + end + 3);
    Some(Html::Comment { text })
}

fn element(cursor: &mut Cursor) -> Option<Html> {
    let rest = cursor.rest();
    let start_tag_end = rest.find('>')?;
    let start_tag = &rest[1..start_tag_end];

    let tag: String = start_tag
        .chars()
        .take_while(|c| *c != ' ' && *c != '\n' && *c != '/')
        .collect();
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }

    let self_closing = start_tag.ends_with('/');
    let attributes = if self_closing {
        attributes(&start_tag[tag.len()..start_tag.len() - 1])
    } else {
        attributes(&start_tag[tag.len()..])
    };

    if self_closing {
        cursor.consume(start_tag_end + 1);
        return Some(Html::Element {
            tag,
            attributes,
            children: vec![],
        });
    }

    let content = &rest[start_tag_end + 1..];
    match find_closing_tag(content, &tag) {
        Some(end) => {
            let children = parse_html(&content[..end]);
            cursor.consume(start_tag_end + 1 + end + tag.len() + 3);
            Some(Html::Element {
                tag,
                attributes,
                children,
            })
        }
        None if is_void_element(&tag) => {
            cursor.consume(start_tag_end + 1);
            Some(Html::Element {
                tag,
                attributes,
                children: vec![],
            })
        }
        None => None,
    }
}

/// Find the byte offset of the `</tag>` closing the element whose content starts at `content`,
/// skipping over nested elements with the same tag
fn find_closing_tag(content: &str, tag: &str) -> Option<usize> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < content.len() {
        let rest = &content[pos..];
        if rest.starts_with(&close) {
            if depth == 0 {
                return Some(pos);
            }
            depth -= 1;
            pos += close.len();
            continue;
        }
        if rest.starts_with(&open) {
            let opens_same_tag = matches!(
                rest[open.len()..].chars().next(),
                Some(' ') | Some('>') | Some('\n')
            );
            if opens_same_tag {
                depth += 1;
            }
            pos += open.len();
            continue;
        }
        pos += rest.chars().next().map(char::len_utf8).unwrap_or(1);
    }

    None
}

fn attributes(start_tag_content: &str) -> Attributes {
    let mut attributes = Attributes::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut quote: Option<char> = None;
    let mut chars = start_tag_content.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quote) {
            (c, Some(q)) if c == q => quote = None,
            (c, Some(_)) => value.push(c),
            (' ' | '\n', None) => {
                if !key.is_empty() {
                    attributes.insert(std::mem::take(&mut key), std::mem::take(&mut value));
                }
            }
            ('=', None) => {
                if let Some(q @ ('"' | '\'')) = chars.peek().copied() {
                    chars.next();
                    quote = Some(q);
                }
            }
            (c, None) => key.push(c),
        }
    }
    if !key.is_empty() {
        attributes.insert(key, value);
    }

    attributes
}

/// check if a html tag is a void tag (it can not have children)
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "base"
            | "img"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "area"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
