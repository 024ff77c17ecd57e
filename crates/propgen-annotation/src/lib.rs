//! # propgen-annotation
//!
//! **Tier 1 (Annotation Classification)**
//!
//! Maps raw Python annotation text (as unparsed by the source analyzer) onto
//! the closed `TypeDescriptor` vocabulary. Anything outside the recognised
//! shapes becomes `Named` (a plain or dotted identifier) or `Unknown`.
//!
//! ## What belongs here
//! * Tokenizing and parsing annotation text
//! * The table of recognised `typing` / builtin spellings
//!
//! ## What does NOT belong here
//! * Strategy decisions (see propgen-strategy)
//! * Reading source files

use propgen_types::TypeDescriptor;

/// Bracket nesting beyond this classifies as `Unknown`.
pub const MAX_NESTING: usize = 32;

const QUALIFIERS: &[&str] = &[
    "typing_extensions.",
    "typing.",
    "collections.abc.",
    "collections.",
    "builtins.",
    "t.",
];

const SEQUENCE_NAMES: &[&str] = &[
    "list",
    "List",
    "Sequence",
    "MutableSequence",
    "Iterable",
    "Collection",
    "deque",
    "Deque",
];

const SET_NAMES: &[&str] = &[
    "set",
    "Set",
    "frozenset",
    "FrozenSet",
    "AbstractSet",
    "MutableSet",
];

const MAPPING_NAMES: &[&str] = &[
    "dict",
    "Dict",
    "Mapping",
    "MutableMapping",
    "OrderedDict",
    "DefaultDict",
    "defaultdict",
];

// Recognised typing constructs with no counterpart in the vocabulary.
const UNSUPPORTED_NAMES: &[&str] = &[
    "Any",
    "object",
    "complex",
    "Callable",
    "Literal",
    "Type",
    "type",
    "Iterator",
    "Generator",
    "AsyncIterator",
    "AsyncGenerator",
    "Awaitable",
    "Coroutine",
    "TypeVar",
    "TypeGuard",
    "ClassVar",
    "Final",
    "Self",
    "NoReturn",
    "Never",
    "tuple",
    "Tuple",
];

/// Classify annotation text. Never fails: unclassifiable text is `Unknown`.
pub fn classify(text: &str) -> TypeDescriptor {
    classify_at(text, 0)
}

/// Classify an optional annotation; absent or blank text is `Unknown`.
pub fn classify_opt(text: Option<&str>) -> TypeDescriptor {
    match text {
        Some(t) if !t.trim().is_empty() => classify(t),
        _ => TypeDescriptor::Unknown,
    }
}

fn classify_at(text: &str, depth: usize) -> TypeDescriptor {
    if depth > MAX_NESTING {
        return TypeDescriptor::Unknown;
    }
    let Some(tokens) = tokenize(text) else {
        return TypeDescriptor::Unknown;
    };
    if tokens.is_empty() {
        return TypeDescriptor::Unknown;
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    match parser.union(depth) {
        Some(node) if parser.at_end() => node.into_descriptor(),
        _ => TypeDescriptor::Unknown,
    }
}

// -----------------------------------------------------------------------------
// Tokenizer
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    Str(String),
    LBracket,
    RBracket,
    Comma,
    Pipe,
    Ellipsis,
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '[' => {
                out.push(Token::LBracket);
                i += 1;
            }
            ']' => {
                out.push(Token::RBracket);
                i += 1;
            }
            ',' => {
                out.push(Token::Comma);
                i += 1;
            }
            '|' => {
                out.push(Token::Pipe);
                i += 1;
            }
            '.' => {
                if chars.get(i..i + 3) == Some(&['.', '.', '.'][..]) {
                    out.push(Token::Ellipsis);
                    i += 3;
                } else {
                    return None;
                }
            }
            '\'' | '"' => {
                let close = chars[i + 1..].iter().position(|&q| q == c)?;
                let inner: String = chars[i + 1..i + 1 + close].iter().collect();
                out.push(Token::Str(inner));
                i += close + 2;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
                {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                if name.split('.').any(str::is_empty) {
                    return None;
                }
                out.push(Token::Name(name));
            }
            _ => return None,
        }
    }
    Some(out)
}

// -----------------------------------------------------------------------------
// Parser
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Ty(TypeDescriptor),
    NoneType,
}

impl Node {
    fn into_descriptor(self) -> TypeDescriptor {
        match self {
            Node::Ty(t) => t,
            Node::NoneType => TypeDescriptor::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Node(Node),
    Ellipsis,
    List,
}

impl Arg {
    fn descriptor(&self) -> TypeDescriptor {
        match self {
            Arg::Node(n) => n.clone().into_descriptor(),
            Arg::Ellipsis | Arg::List => TypeDescriptor::Unknown,
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn union(&mut self, depth: usize) -> Option<Node> {
        if depth > MAX_NESTING {
            return None;
        }
        let mut alternatives = vec![self.term(depth)?];
        while self.eat(&Token::Pipe) {
            alternatives.push(self.term(depth)?);
        }
        if alternatives.len() == 1 {
            return alternatives.pop();
        }
        Some(combine(alternatives))
    }

    fn term(&mut self, depth: usize) -> Option<Node> {
        let token = self.peek()?.clone();
        self.pos += 1;
        match token {
            Token::Str(inner) => match classify_at(&inner, depth + 1) {
                TypeDescriptor::Unknown if inner.trim() == "None" => Some(Node::NoneType),
                t => Some(Node::Ty(t)),
            },
            Token::Name(name) => {
                let args = if self.eat(&Token::LBracket) {
                    Some(self.args(depth + 1)?)
                } else {
                    None
                };
                Some(interpret(&name, args))
            }
            _ => None,
        }
    }

    fn args(&mut self, depth: usize) -> Option<Vec<Arg>> {
        if depth > MAX_NESTING {
            return None;
        }
        let mut args = Vec::new();
        if self.eat(&Token::RBracket) {
            return Some(args);
        }
        loop {
            let arg = if self.eat(&Token::Ellipsis) {
                Arg::Ellipsis
            } else if self.eat(&Token::LBracket) {
                self.args(depth + 1)?;
                Arg::List
            } else {
                Arg::Node(self.union(depth)?)
            };
            args.push(arg);
            if self.eat(&Token::RBracket) {
                return Some(args);
            }
            if !self.eat(&Token::Comma) {
                return None;
            }
            if self.eat(&Token::RBracket) {
                return Some(args);
            }
        }
    }
}

fn strip_qualifier(name: &str) -> &str {
    QUALIFIERS
        .iter()
        .find_map(|q| name.strip_prefix(q))
        .filter(|rest| !rest.contains('.'))
        .unwrap_or(name)
}

fn interpret(name: &str, args: Option<Vec<Arg>>) -> Node {
    use TypeDescriptor as T;

    let base = strip_qualifier(name);
    let args = args.as_deref();

    let ty = match (base, args) {
        ("None" | "NoneType", None) => return Node::NoneType,
        ("int", None) => T::integer(),
        ("float", None) => T::float(),
        ("bool", None) => T::boolean(),
        ("str" | "LiteralString", None) => T::text(),
        ("bytes" | "bytearray", None) => T::bytes(),

        (b, None) if SEQUENCE_NAMES.contains(&b) => T::sequence_of(T::Unknown),
        (b, Some([elem])) if SEQUENCE_NAMES.contains(&b) => T::sequence_of(elem.descriptor()),
        ("tuple" | "Tuple", Some([elem, Arg::Ellipsis])) => T::sequence_of(elem.descriptor()),

        (b, None) if SET_NAMES.contains(&b) => T::set_of(T::Unknown),
        (b, Some([elem])) if SET_NAMES.contains(&b) => T::set_of(elem.descriptor()),

        (b, None) if MAPPING_NAMES.contains(&b) => T::mapping_of(T::Unknown, T::Unknown),
        (b, Some([k, v])) if MAPPING_NAMES.contains(&b) => {
            T::mapping_of(k.descriptor(), v.descriptor())
        }

        ("Optional", Some([inner])) => {
            return combine(vec![arg_node(inner), Node::NoneType]);
        }
        ("Union", Some(alts)) if !alts.is_empty() => {
            return combine(alts.iter().map(arg_node).collect());
        }
        ("Annotated", Some([first, ..])) => return arg_node(first),

        (b, _) if UNSUPPORTED_NAMES.contains(&b) => T::Unknown,
        ("int" | "float" | "bool" | "str" | "bytes" | "bytearray", Some(_)) => T::Unknown,
        (b, _) if SEQUENCE_NAMES.contains(&b) => T::Unknown,
        (b, _) if SET_NAMES.contains(&b) => T::Unknown,
        (b, _) if MAPPING_NAMES.contains(&b) => T::Unknown,
        ("Optional" | "Union" | "Annotated" | "None" | "NoneType", _) => T::Unknown,
        (b, None) => T::named(b),
        (_, Some(_)) => T::Unknown,
    };
    Node::Ty(ty)
}

fn push(t: TypeDescriptor, flat: &mut Vec<TypeDescriptor>) {
    if !flat.contains(&t) {
        flat.push(t);
    }
}

fn arg_node(arg: &Arg) -> Node {
    match arg {
        Arg::Node(n) => n.clone(),
        Arg::Ellipsis | Arg::List => Node::Ty(TypeDescriptor::Unknown),
    }
}

/// Build a union from alternatives, folding `None` into `Optional`.
fn combine(alternatives: Vec<Node>) -> Node {
    let mut has_none = false;
    let mut flat: Vec<TypeDescriptor> = Vec::new();

    for alt in alternatives {
        match alt {
            Node::NoneType => has_none = true,
            Node::Ty(TypeDescriptor::Optional(inner)) => {
                has_none = true;
                match *inner {
                    TypeDescriptor::Union(alts) => {
                        for a in alts {
                            push(a, &mut flat);
                        }
                    }
                    other => push(other, &mut flat),
                }
            }
            Node::Ty(TypeDescriptor::Union(alts)) => {
                for a in alts {
                    push(a, &mut flat);
                }
            }
            Node::Ty(other) => push(other, &mut flat),
        }
    }

    let core = match flat.len() {
        0 => None,
        1 => flat.pop(),
        _ => Some(TypeDescriptor::Union(flat)),
    };

    match (core, has_none) {
        (None, _) => Node::NoneType,
        (Some(t), true) => Node::Ty(TypeDescriptor::optional(t)),
        (Some(t), false) => Node::Ty(t),
    }
}
