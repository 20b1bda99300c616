//! A parser for the declaration subset of HLSL headers.
//!
//! Only `struct` and `cbuffer` blocks, `#define NAME <integer>`
//! and `#pragma pack_matrix` are interpreted.
//! Everything else at the top level is skipped.
use log::{debug, warn};

use crate::{CreateModuleError, SourceLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixLayout {
    #[default]
    ColumnMajor,
    RowMajor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Struct,
    CBuffer,
}

#[derive(Debug, PartialEq)]
pub enum Item {
    Define { name: String, value: u64 },
    Block(BlockDecl),
}

#[derive(Debug, PartialEq)]
pub struct BlockDecl {
    pub kind: BlockKind,
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub location: SourceLocation,
}

#[derive(Debug, PartialEq)]
pub struct FieldDecl {
    pub ty: String,
    pub ty_location: SourceLocation,
    pub name: String,
    pub dims: Vec<Dim>,
    pub matrix_layout: MatrixLayout,
    pub location: SourceLocation,
}

#[derive(Debug, PartialEq)]
pub enum Dim {
    Literal(u64),
    Named(String),
}

pub fn parse_header(source: &str) -> Result<Vec<Item>, CreateModuleError> {
    let tokens = Lexer::new(source).tokenize()?;
    let end = tokens.last().map(|t| t.location).unwrap_or_default();
    let mut parser = Parser {
        tokens,
        pos: 0,
        end,
        matrix_layout: MatrixLayout::default(),
        items: Vec::new(),
    };
    parser.items()?;
    Ok(parser.items)
}

pub fn parse_integer(text: &str) -> Option<u64> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => digits.parse().ok(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(String),
    Punct(char),
    /// The text of a preprocessor line after the `#`.
    Directive(String),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    location: SourceLocation,
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            line_start: true,
        }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = true;
        } else {
            self.column += 1;
            if !c.is_whitespace() {
                self.line_start = false;
            }
        }
        Some(c)
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&f) {
            self.bump();
        }
        self.source[start..self.pos].to_string()
    }

    fn tokenize(mut self) -> Result<Vec<Token>, CreateModuleError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            let location = self.location();
            let kind = match c {
                _ if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '/' if self.peek_second() == Some('/') => {
                    self.take_while(|c| c != '\n');
                    continue;
                }
                '/' if self.peek_second() == Some('*') => {
                    self.block_comment(location)?;
                    continue;
                }
                '#' if self.line_start => {
                    self.bump();
                    TokenKind::Directive(self.directive())
                }
                _ if c.is_ascii_alphabetic() || c == '_' => {
                    TokenKind::Ident(self.take_while(|c| c.is_ascii_alphanumeric() || c == '_'))
                }
                _ if c.is_ascii_digit() => {
                    TokenKind::Number(self.take_while(|c| c.is_ascii_alphanumeric() || c == '.'))
                }
                _ => {
                    self.bump();
                    TokenKind::Punct(c)
                }
            };
            tokens.push(Token { kind, location });
        }
        Ok(tokens)
    }

    fn block_comment(&mut self, location: SourceLocation) -> Result<(), CreateModuleError> {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => (),
                None => {
                    return Err(CreateModuleError::ParseError {
                        message: "unterminated block comment".to_string(),
                        location,
                    })
                }
            }
        }
    }

    fn directive(&mut self) -> String {
        let mut text = String::new();
        loop {
            let line = self.take_while(|c| c != '\n');
            match line.trim_end().strip_suffix('\\') {
                Some(continued) => {
                    text.push_str(continued);
                    text.push(' ');
                    self.bump();
                }
                None => {
                    text.push_str(&line);
                    break;
                }
            }
        }
        // Comments end the directive.
        match text.find("//") {
            Some(end) => text[..end].trim().to_string(),
            None => text.trim().to_string(),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: SourceLocation,
    matrix_layout: MatrixLayout,
    items: Vec<Item>,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_nth(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    fn location(&self) -> SourceLocation {
        self.tokens
            .get(self.pos)
            .map(|t| t.location)
            .unwrap_or(self.end)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> CreateModuleError {
        CreateModuleError::ParseError {
            message: message.into(),
            location: self.location(),
        }
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek() == Some(&TokenKind::Punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char, context: &str) -> Result<(), CreateModuleError> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{c}` {context}")))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, SourceLocation), CreateModuleError> {
        match self.peek() {
            Some(TokenKind::Ident(_)) => match self.next() {
                Some(Token {
                    kind: TokenKind::Ident(name),
                    location,
                }) => Ok((name, location)),
                _ => Err(self.error(format!("expected {what}"))),
            },
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    fn items(&mut self) -> Result<(), CreateModuleError> {
        while let Some(kind) = self.peek().cloned() {
            match kind {
                TokenKind::Directive(text) => {
                    let location = self.location();
                    self.pos += 1;
                    self.directive(&text, location);
                }
                TokenKind::Ident(keyword) if keyword == "cbuffer" => {
                    let block = self.block(BlockKind::CBuffer)?;
                    self.items.push(Item::Block(block));
                }
                TokenKind::Ident(keyword)
                    if keyword == "struct"
                        && matches!(self.peek_nth(1), Some(TokenKind::Ident(_)))
                        && self.peek_nth(2) == Some(&TokenKind::Punct('{')) =>
                {
                    let block = self.block(BlockKind::Struct)?;
                    self.items.push(Item::Block(block));
                }
                _ => self.skip_item(),
            }
        }
        Ok(())
    }

    fn directive(&mut self, text: &str, location: SourceLocation) {
        let mut words = text.split_whitespace();
        match words.next() {
            Some("define") => {
                let name = words.next().filter(|n| is_identifier(n));
                let value = words.next().and_then(parse_integer);
                match (name, value, words.next()) {
                    (Some(name), Some(value), None) => self.items.push(Item::Define {
                        name: name.to_string(),
                        value,
                    }),
                    _ => debug!("Skipping non integer define at {location}: #{text}"),
                }
            }
            Some("pragma") if text.contains("pack_matrix") => {
                if text.contains("row_major") {
                    self.matrix_layout = MatrixLayout::RowMajor;
                } else if text.contains("column_major") {
                    self.matrix_layout = MatrixLayout::ColumnMajor;
                }
            }
            _ => debug!("Skipping directive at {location}: #{text}"),
        }
    }

    fn skip_item(&mut self) {
        debug!("Skipping top level item at {}", self.location());
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Directive(_) if depth == 0 => return,
                TokenKind::Punct(';') if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => (),
            }
            self.pos += 1;
        }
    }

    fn block(&mut self, kind: BlockKind) -> Result<BlockDecl, CreateModuleError> {
        self.pos += 1;
        let (name, location) = self.expect_ident("a block name")?;

        if kind == BlockKind::CBuffer {
            // Skip register bindings like `: register(b0)`.
            while !self.eat_punct('{') {
                match self.peek() {
                    None | Some(TokenKind::Punct(';')) => {
                        return Err(self.error("expected `{` after cbuffer name"))
                    }
                    _ => self.pos += 1,
                }
            }
        } else {
            self.expect_punct('{', "after struct name")?;
        }

        let mut fields = Vec::new();
        loop {
            match self.peek().cloned() {
                Some(TokenKind::Punct('}')) => {
                    self.pos += 1;
                    break;
                }
                Some(TokenKind::Directive(text)) => {
                    let location = self.location();
                    self.pos += 1;
                    self.directive(&text, location);
                }
                Some(_) => self.field_declarations(&mut fields)?,
                None => return Err(self.error(format!("expected `}}` to close `{name}`"))),
            }
        }

        match kind {
            BlockKind::Struct => {
                if matches!(self.peek(), Some(TokenKind::Ident(_))) {
                    debug!("Skipping variable declared with struct {name}");
                    while !matches!(self.peek(), None | Some(TokenKind::Punct(';'))) {
                        self.pos += 1;
                    }
                }
                self.expect_punct(';', "after struct declaration")?;
            }
            BlockKind::CBuffer => {
                self.eat_punct(';');
            }
        }

        Ok(BlockDecl {
            kind,
            name,
            fields,
            location,
        })
    }

    fn field_declarations(&mut self, fields: &mut Vec<FieldDecl>) -> Result<(), CreateModuleError> {
        let mut matrix_layout = self.matrix_layout;
        let (ty, ty_location) = loop {
            let (word, location) = self.expect_ident("a field type")?;
            match word.as_str() {
                "row_major" => matrix_layout = MatrixLayout::RowMajor,
                "column_major" => matrix_layout = MatrixLayout::ColumnMajor,
                "const" | "uniform" | "precise" | "nointerpolation" | "linear" | "centroid"
                | "noperspective" | "sample" | "snorm" | "unorm" => {
                    warn!("Ignoring modifier `{word}` at {location}")
                }
                _ => break (word, location),
            }
        };

        loop {
            let (name, location) = self.expect_ident("a field name")?;

            let mut dims = Vec::new();
            while self.eat_punct('[') {
                let dim = match self.next().map(|t| t.kind) {
                    Some(TokenKind::Ident(name)) => Dim::Named(name),
                    Some(TokenKind::Number(text)) => match parse_integer(&text) {
                        Some(value) => Dim::Literal(value),
                        None => return Err(self.error(format!("invalid array size `{text}`"))),
                    },
                    _ => return Err(self.error("expected an array size")),
                };
                dims.push(dim);
                self.expect_punct(']', "after array size")?;
            }

            if self.eat_punct(':') {
                let (semantic, semantic_location) = self.expect_ident("a semantic")?;
                if self.eat_punct('(') {
                    self.skip_until(')');
                    self.expect_punct(')', "after binding")?;
                }
                warn!("Ignoring `{semantic}` on field `{name}` at {semantic_location}");
            }

            if self.eat_punct('=') {
                warn!("Ignoring default value of field `{name}` at {location}");
                self.skip_initializer();
            }

            fields.push(FieldDecl {
                ty: ty.clone(),
                ty_location,
                name,
                dims,
                matrix_layout,
                location,
            });

            if !self.eat_punct(',') {
                return self.expect_punct(';', "after field declaration");
            }
        }
    }

    fn skip_until(&mut self, c: char) {
        while let Some(kind) = self.peek() {
            if *kind == TokenKind::Punct(c) {
                return;
            }
            self.pos += 1;
        }
    }

    fn skip_initializer(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Punct('{' | '(') => depth += 1,
                TokenKind::Punct('}' | ')') => depth = depth.saturating_sub(1),
                TokenKind::Punct(',' | ';') if depth == 0 => return,
                _ => (),
            }
            self.pos += 1;
        }
    }
}

fn is_identifier(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn location(line: usize, column: usize) -> SourceLocation {
        SourceLocation { line, column }
    }

    fn blocks(source: &str) -> Vec<BlockDecl> {
        parse_header(source)
            .unwrap()
            .into_iter()
            .filter_map(|item| match item {
                Item::Block(block) => Some(block),
                Item::Define { .. } => None,
            })
            .collect()
    }

    #[test]
    fn parse_struct_fields() {
        let source = indoc! {"
            struct funk
            {
                float shininessxx;
                float3 hest[2];
                float lala, bar;
            };
        "};

        assert_eq!(
            vec![BlockDecl {
                kind: BlockKind::Struct,
                name: "funk".to_string(),
                fields: vec![
                    FieldDecl {
                        ty: "float".to_string(),
                        ty_location: location(3, 5),
                        name: "shininessxx".to_string(),
                        dims: Vec::new(),
                        matrix_layout: MatrixLayout::ColumnMajor,
                        location: location(3, 11),
                    },
                    FieldDecl {
                        ty: "float3".to_string(),
                        ty_location: location(4, 5),
                        name: "hest".to_string(),
                        dims: vec![Dim::Literal(2)],
                        matrix_layout: MatrixLayout::ColumnMajor,
                        location: location(4, 12),
                    },
                    FieldDecl {
                        ty: "float".to_string(),
                        ty_location: location(5, 5),
                        name: "lala".to_string(),
                        dims: Vec::new(),
                        matrix_layout: MatrixLayout::ColumnMajor,
                        location: location(5, 11),
                    },
                    FieldDecl {
                        ty: "float".to_string(),
                        ty_location: location(5, 5),
                        name: "bar".to_string(),
                        dims: Vec::new(),
                        matrix_layout: MatrixLayout::ColumnMajor,
                        location: location(5, 17),
                    },
                ],
                location: location(1, 8),
            }],
            blocks(source)
        );
    }

    #[test]
    fn parse_defines_and_dimensions() {
        let source = indoc! {"
            #define ASDF 4
            #define BADF 0x2u // columns
            #define NAME(x) x
            #include \"helpers/descriptorhandle.h\"

            struct A { float opacity[ASDF][BADF]; uint b[3]; };
        "};

        let items = parse_header(source).unwrap();
        assert_eq!(3, items.len());
        assert_eq!(
            Item::Define {
                name: "ASDF".to_string(),
                value: 4
            },
            items[0]
        );
        assert_eq!(
            Item::Define {
                name: "BADF".to_string(),
                value: 2
            },
            items[1]
        );

        let Item::Block(block) = &items[2] else {
            panic!("expected a struct");
        };
        assert_eq!(
            vec![Dim::Named("ASDF".to_string()), Dim::Named("BADF".to_string())],
            block.fields[0].dims
        );
        assert_eq!(vec![Dim::Literal(3)], block.fields[1].dims);
    }

    #[test]
    fn parse_cbuffer_with_register_and_semantics() {
        let source = indoc! {"
            cbuffer PerObject : register(b0)
            {
                row_major float4x4 world : packoffset(c0);
                float4 tint = float4(1, 1, 1, 1), glow;
            }
        "};

        let blocks = blocks(source);
        assert_eq!(1, blocks.len());
        assert_eq!(BlockKind::CBuffer, blocks[0].kind);
        assert_eq!("PerObject", blocks[0].name);

        let fields: Vec<_> = blocks[0]
            .fields
            .iter()
            .map(|f| (f.ty.as_str(), f.name.as_str(), f.matrix_layout))
            .collect();
        assert_eq!(
            vec![
                ("float4x4", "world", MatrixLayout::RowMajor),
                ("float4", "tint", MatrixLayout::ColumnMajor),
                ("float4", "glow", MatrixLayout::ColumnMajor),
            ],
            fields
        );
    }

    #[test]
    fn parse_pack_matrix_pragma() {
        let source = indoc! {"
            struct A { float3x3 a; };
            #pragma pack_matrix(row_major)
            struct B { float3x3 b; column_major float3x3 c; };
        "};

        let layouts: Vec<_> = blocks(source)
            .iter()
            .flat_map(|b| b.fields.iter().map(|f| f.matrix_layout))
            .collect();
        assert_eq!(
            vec![
                MatrixLayout::ColumnMajor,
                MatrixLayout::RowMajor,
                MatrixLayout::ColumnMajor
            ],
            layouts
        );
    }

    #[test]
    fn skip_functions_and_globals() {
        let source = indoc! {"
            /* shared types
               for the renderer */
            Texture2D baseTexture : register(t0);
            static const uint count = 4;

            float4 shade(float3 n) {
                if (n.x > 0) { return 1; }
                return 0;
            }

            struct Light { float3 direction; }; // comment
            struct Light light;
        "};

        let blocks = blocks(source);
        assert_eq!(1, blocks.len());
        assert_eq!("Light", blocks[0].name);
        assert_eq!(location(11, 8), blocks[0].location);
    }

    #[test]
    fn parse_multiline_define() {
        let items = parse_header("#define COUNT \\\n 8\nstruct A { float a[COUNT]; };").unwrap();
        assert_eq!(
            Item::Define {
                name: "COUNT".to_string(),
                value: 8
            },
            items[0]
        );
    }

    #[test]
    fn missing_semicolon() {
        let source = "struct A\n{\n    float a\n};\n";
        let Err(CreateModuleError::ParseError { location: error, .. }) = parse_header(source) else {
            panic!("expected a parse error");
        };
        assert_eq!(location(4, 1), error);
    }

    #[test]
    fn unterminated_struct() {
        let result = parse_header("struct A { float a;");
        assert!(matches!(result, Err(CreateModuleError::ParseError { .. })));
    }

    #[test]
    fn unterminated_comment() {
        let Err(CreateModuleError::ParseError { location: error, .. }) =
            parse_header("struct A { float a; }; /* trailing")
        else {
            panic!("expected a parse error");
        };
        assert_eq!(location(1, 24), error);
    }

    #[test]
    fn invalid_array_size() {
        let result = parse_header("struct A { float a[1.5]; };");
        assert!(matches!(result, Err(CreateModuleError::ParseError { message, .. }) if message == "invalid array size `1.5`"));
    }

    #[test]
    fn integers() {
        assert_eq!(Some(16), parse_integer("16"));
        assert_eq!(Some(16), parse_integer("16u"));
        assert_eq!(Some(255), parse_integer("0xFF"));
        assert_eq!(None, parse_integer("1.0"));
        assert_eq!(None, parse_integer("x"));
    }
}
