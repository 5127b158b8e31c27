//! Recursive-descent parser for schema source
//!
//! Consumes the token stream and produces the raw constructs of one
//! file: named rulesets (including the root `schema` block as the
//! ruleset `main`), enums and import statements. Every construct
//! reference is produced as `RuleType::Unresolved`; classification
//! against the file's declarations happens afterwards.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result, SyntaxError};
use crate::types::{
    EnumItem, ImportedType, Rule, RuleType, YamlatorEnum, YamlatorRuleset, KEYLESS_RULE_DIRECTIVE,
    ROOT_RULESET_NAME,
};

use super::lexer::{source_line, Token, TokenKind};

/// Pattern every construct name must match
static CONSTRUCT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").unwrap());

/// Raw constructs of a single parsed file
#[derive(Debug, Default)]
pub(crate) struct ParsedFile {
    /// Rulesets keyed by name, the `schema` block included as `main`
    pub rulesets: IndexMap<String, YamlatorRuleset>,
    /// Enums keyed by name
    pub enums: IndexMap<String, YamlatorEnum>,
    /// Import statements in source order
    pub imports: Vec<ImportedType>,
}

pub(crate) struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Attach position and source context to a syntax error
    fn locate(&self, err: SyntaxError, token: &Token) -> Error {
        let mut err = err.with_position(token.line, token.column);
        if let Some(text) = source_line(self.source, token.line) {
            err = err.with_context(text);
        }
        Error::Syntax(err)
    }

    fn error_at(&self, token: &Token, message: String) -> Error {
        self.locate(SyntaxError::new(message), token)
    }

    fn unexpected_end(&self, expected: &str) -> Error {
        Error::Syntax(SyntaxError::new(format!(
            "unexpected end of input: expected {}",
            expected
        )))
    }

    /// Consume a token that must match `kind` exactly
    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        match self.bump() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(self.error_at(
                &token,
                format!("unexpected {}: expected {}", token.kind.describe(), expected),
            )),
            None => Err(self.unexpected_end(expected)),
        }
    }

    /// Parse every top-level statement in the file
    pub(crate) fn parse(mut self) -> Result<ParsedFile> {
        let mut parsed = ParsedFile::default();

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Strict => {
                    let strict_token = self.bump().ok_or_else(|| self.unexpected_end("a block"))?;
                    match self.peek_kind() {
                        Some(TokenKind::Schema) => self.parse_schema_block(true, &mut parsed)?,
                        Some(TokenKind::Ruleset) => self.parse_ruleset(true, &mut parsed)?,
                        _ => {
                            return Err(self.error_at(
                                &strict_token,
                                "expected 'schema' or 'ruleset' after 'strict'".to_string(),
                            ))
                        }
                    }
                }
                TokenKind::Schema => self.parse_schema_block(false, &mut parsed)?,
                TokenKind::Ruleset => self.parse_ruleset(false, &mut parsed)?,
                TokenKind::Enum => self.parse_enum(&mut parsed)?,
                TokenKind::Import => self.parse_import(&mut parsed)?,
                _ => {
                    let token = token.clone();
                    return Err(self.error_at(
                        &token,
                        format!(
                            "unexpected {}: expected 'schema', 'ruleset', 'enum' or 'import'",
                            token.kind.describe()
                        ),
                    ));
                }
            }
        }

        Ok(parsed)
    }

    /// Parse `schema { rules }` into the ruleset named `main`
    fn parse_schema_block(&mut self, is_strict: bool, parsed: &mut ParsedFile) -> Result<()> {
        let keyword = self
            .bump()
            .ok_or_else(|| self.unexpected_end("'schema'"))?;
        self.expect(TokenKind::LeftBrace, "'{'")?;

        let rules = self.parse_rules()?;
        if rules.is_empty() {
            return Err(self.locate(SyntaxError::missing_rules("schema"), &keyword));
        }

        let root = YamlatorRuleset::new(ROOT_RULESET_NAME, rules).with_strict(is_strict);
        parsed.rulesets.insert(ROOT_RULESET_NAME.to_string(), root);
        Ok(())
    }

    /// Parse `ruleset Name(Parent)? { rules }`
    fn parse_ruleset(&mut self, is_strict: bool, parsed: &mut ParsedFile) -> Result<()> {
        self.bump();

        let name_token = match self.bump() {
            Some(token) => token,
            None => return Err(self.unexpected_end("a ruleset name")),
        };
        let name = match &name_token.kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(self.error_at(
                    &name_token,
                    format!("unexpected {}: expected a ruleset name", other.describe()),
                ))
            }
        };
        if !CONSTRUCT_NAME.is_match(&name) {
            return Err(self.locate(SyntaxError::malformed_ruleset_name(&name), &name_token));
        }

        let parent = if self.peek_kind() == Some(&TokenKind::LeftParen) {
            self.bump();
            let parent = self.parse_reference_name("a parent ruleset name")?;
            self.expect(TokenKind::RightParen, "')'")?;
            Some(parent)
        } else {
            None
        };

        self.expect(TokenKind::LeftBrace, "'{'")?;
        let rules = self.parse_rules()?;
        if rules.is_empty() {
            return Err(self.locate(
                SyntaxError::missing_rules(format!("ruleset {}", name)),
                &name_token,
            ));
        }

        let mut ruleset = YamlatorRuleset::new(name.clone(), rules).with_strict(is_strict);
        if let Some(parent) = parent {
            ruleset = ruleset.with_parent(parent);
        }
        parsed.rulesets.insert(name, ruleset);
        Ok(())
    }

    /// Parse `enum Name { ITEM = literal ... }`
    fn parse_enum(&mut self, parsed: &mut ParsedFile) -> Result<()> {
        self.bump();

        let name_token = match self.bump() {
            Some(token) => token,
            None => return Err(self.unexpected_end("an enum name")),
        };
        let name = match &name_token.kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(self.error_at(
                    &name_token,
                    format!("unexpected {}: expected an enum name", other.describe()),
                ))
            }
        };
        if !CONSTRUCT_NAME.is_match(&name) {
            return Err(self.locate(SyntaxError::malformed_enum_name(&name), &name_token));
        }

        self.expect(TokenKind::LeftBrace, "'{'")?;

        let mut result = YamlatorEnum::new(name.clone());
        loop {
            let token = match self.bump() {
                Some(token) => token,
                None => return Err(self.unexpected_end("an enum item or '}'")),
            };
            match &token.kind {
                TokenKind::RightBrace => break,
                TokenKind::Ident(item_name) => {
                    self.expect(TokenKind::Equals, "'='")?;
                    let value_token = match self.bump() {
                        Some(token) => token,
                        None => return Err(self.unexpected_end("an enum value")),
                    };
                    let value = match &value_token.kind {
                        TokenKind::StringLit(text) => text.clone(),
                        TokenKind::IntLit(value) => value.to_string(),
                        TokenKind::FloatLit(value) => value.to_string(),
                        other => {
                            return Err(self.error_at(
                                &value_token,
                                format!(
                                    "unexpected {}: expected a string or number literal",
                                    other.describe()
                                ),
                            ))
                        }
                    };
                    result.add_item(EnumItem::new(item_name.clone(), value));
                }
                other => {
                    return Err(self.error_at(
                        &token,
                        format!("unexpected {}: expected an enum item or '}}'", other.describe()),
                    ))
                }
            }
        }

        if result.items.is_empty() {
            return Err(self.locate(
                SyntaxError::new(format!("enum '{}' must declare at least one item", name)),
                &name_token,
            ));
        }

        parsed.enums.insert(name, result);
        Ok(())
    }

    /// Parse `import { A, B } from "path" (as ns)?`
    fn parse_import(&mut self, parsed: &mut ParsedFile) -> Result<()> {
        self.bump();
        self.expect(TokenKind::LeftBrace, "'{'")?;

        let mut items = Vec::new();
        loop {
            let token = match self.bump() {
                Some(token) => token,
                None => return Err(self.unexpected_end("an import item")),
            };
            match &token.kind {
                TokenKind::Ident(item) if CONSTRUCT_NAME.is_match(item) => {
                    items.push(item.clone())
                }
                TokenKind::Ident(item) => {
                    return Err(self.error_at(
                        &token,
                        format!("'{}' is not a valid construct name", item),
                    ))
                }
                other => {
                    return Err(self.error_at(
                        &token,
                        format!("unexpected {}: expected an import item", other.describe()),
                    ))
                }
            }
            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.bump();
                }
                _ => break,
            }
        }
        self.expect(TokenKind::RightBrace, "'}'")?;
        self.expect(TokenKind::From, "'from'")?;

        let path_token = match self.bump() {
            Some(token) => token,
            None => return Err(self.unexpected_end("a quoted schema path")),
        };
        let source_path = match &path_token.kind {
            TokenKind::StringLit(path) => path.clone(),
            other => {
                return Err(self.error_at(
                    &path_token,
                    format!("unexpected {}: expected a quoted schema path", other.describe()),
                ))
            }
        };

        let namespace = if self.peek_kind() == Some(&TokenKind::As) {
            self.bump();
            let ns_token = match self.bump() {
                Some(token) => token,
                None => return Err(self.unexpected_end("a namespace alias")),
            };
            match &ns_token.kind {
                TokenKind::Ident(alias) => Some(alias.clone()),
                other => {
                    return Err(self.error_at(
                        &ns_token,
                        format!("unexpected {}: expected a namespace alias", other.describe()),
                    ))
                }
            }
        } else {
            None
        };

        for item in items {
            parsed
                .imports
                .push(ImportedType::new(item, source_path.clone(), namespace.clone())?);
        }
        Ok(())
    }

    /// Parse rules until the closing `}` of a block
    fn parse_rules(&mut self) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::RightBrace) => {
                    self.bump();
                    return Ok(rules);
                }
                Some(_) => rules.push(self.parse_rule()?),
                None => return Err(self.unexpected_end("a rule or '}'")),
            }
        }
    }

    /// Parse `name type (required)?`
    fn parse_rule(&mut self) -> Result<Rule> {
        let name_token = match self.bump() {
            Some(token) => token,
            None => return Err(self.unexpected_end("a rule name")),
        };
        let name = match name_token.as_name() {
            Some(name) => name,
            None => {
                return Err(self.error_at(
                    &name_token,
                    format!(
                        "unexpected {}: expected a rule name",
                        name_token.kind.describe()
                    ),
                ))
            }
        };
        if name.starts_with("!!") && name != KEYLESS_RULE_DIRECTIVE {
            return Err(self.error_at(&name_token, format!("unknown directive '{}'", name)));
        }

        let rtype = self.parse_type()?;

        let is_required = if self.peek_kind() == Some(&TokenKind::Required) {
            self.bump();
            true
        } else {
            false
        };

        Ok(Rule::new(name, rtype, is_required))
    }

    /// Parse a type, folding `|` chains into a union
    fn parse_type(&mut self) -> Result<RuleType> {
        let first = self.parse_single_type()?;

        if self.peek_kind() != Some(&TokenKind::Pipe) {
            return Ok(first);
        }

        let mut members = vec![first];
        while self.peek_kind() == Some(&TokenKind::Pipe) {
            let pipe = self.bump().ok_or_else(|| self.unexpected_end("a type"))?;
            let member = self.parse_single_type()?;
            if member.contains_union() {
                return Err(Error::NestedUnion(format!(
                    "the union member '{}' at line {} column {} contains a union: unions must not be nested",
                    member, pipe.line, pipe.column
                )));
            }
            members.push(member);
        }

        if members[0].contains_union() {
            return Err(Error::NestedUnion(format!(
                "the union member '{}' contains a union: unions must not be nested",
                members[0]
            )));
        }

        Ok(RuleType::Union(members))
    }

    /// Parse one type without union alternatives
    fn parse_single_type(&mut self) -> Result<RuleType> {
        let token = match self.bump() {
            Some(token) => token,
            None => return Err(self.unexpected_end("a type")),
        };

        match &token.kind {
            TokenKind::Str => Ok(RuleType::Str),
            TokenKind::Int => Ok(RuleType::Int),
            TokenKind::Float => Ok(RuleType::Float),
            TokenKind::Bool => Ok(RuleType::Bool),
            TokenKind::Any => Ok(RuleType::Any),
            TokenKind::List => {
                self.expect(TokenKind::LeftParen, "'('")?;
                let inner = self.parse_type()?;
                self.expect(TokenKind::RightParen, "')'")?;
                Ok(RuleType::List(Box::new(inner)))
            }
            TokenKind::Map => {
                self.expect(TokenKind::LeftParen, "'('")?;
                let inner = self.parse_type()?;
                self.expect(TokenKind::RightParen, "')'")?;
                Ok(RuleType::Map(Box::new(inner)))
            }
            TokenKind::Regex => {
                self.expect(TokenKind::LeftParen, "'('")?;
                let pattern_token = match self.bump() {
                    Some(token) => token,
                    None => return Err(self.unexpected_end("a quoted pattern")),
                };
                let pattern = match &pattern_token.kind {
                    TokenKind::StringLit(pattern) => pattern.clone(),
                    other => {
                        return Err(self.error_at(
                            &pattern_token,
                            format!("unexpected {}: expected a quoted pattern", other.describe()),
                        ))
                    }
                };
                self.expect(TokenKind::RightParen, "')'")?;
                let compiled = Regex::new(&pattern).map_err(|e| {
                    self.locate(
                        SyntaxError::new(format!("invalid regex pattern '{}': {}", pattern, e)),
                        &pattern_token,
                    )
                })?;
                Ok(RuleType::Regex(compiled))
            }
            TokenKind::Ident(_) => {
                self.pos -= 1;
                let name = self.parse_reference_name("a ruleset or enum name")?;
                Ok(RuleType::Unresolved(name))
            }
            other => Err(self.error_at(
                &token,
                format!("unexpected {}: expected a type", other.describe()),
            )),
        }
    }

    /// Parse a construct reference: `Name` or `alias.Name`
    fn parse_reference_name(&mut self, expected: &str) -> Result<String> {
        let first_token = match self.bump() {
            Some(token) => token,
            None => return Err(self.unexpected_end(expected)),
        };
        let first = match &first_token.kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(self.error_at(
                    &first_token,
                    format!("unexpected {}: expected {}", other.describe(), expected),
                ))
            }
        };

        if self.peek_kind() == Some(&TokenKind::Dot) {
            self.bump();
            let second_token = match self.bump() {
                Some(token) => token,
                None => return Err(self.unexpected_end("a construct name after '.'")),
            };
            let second = match &second_token.kind {
                TokenKind::Ident(name) => name.clone(),
                other => {
                    return Err(self.error_at(
                        &second_token,
                        format!(
                            "unexpected {}: expected a construct name after '.'",
                            other.describe()
                        ),
                    ))
                }
            };
            if !CONSTRUCT_NAME.is_match(&second) {
                return Err(self.error_at(
                    &second_token,
                    format!("'{}.{}' is not a valid type", first, second),
                ));
            }
            return Ok(format!("{}.{}", first, second));
        }

        if !CONSTRUCT_NAME.is_match(&first) {
            return Err(self.error_at(
                &first_token,
                format!("'{}' is not a valid type", first),
            ));
        }
        Ok(first)
    }
}
