//! The parser state machine.
//!
//! The parser works through the token stream in phases. The value phase
//! keeps a stack of collections under construction: a collection is pushed
//! at its opening delimiter, filled through its parent-specific append
//! contract, and popped (and attached to its parent, or made the root) at
//! its closing delimiter. Type constraints are checked at insertion time
//! with best-effort recovery; only unrecoverable syntactic state is fatal.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use uxf_lex::{full_filename, Token, TokenKind};
use uxf_model::{Field, List, Map, TClass, Table, Uxf, Value};
use uxf_util::report::{emit, emit_fatal};
use uxf_util::{codes, ident, Error, Reporter, Result};

use crate::{ImportTracker, ParseOptions};

/// Parser for a UXF token stream.
pub struct Parser<'a> {
    pub(crate) filename: String,
    pub(crate) short_filename: String,
    pub(crate) options: &'a ParseOptions,
    pub(crate) reporter: &'a mut dyn Reporter,
    pub(crate) tracker: &'a mut ImportTracker,
    is_import: bool,
    activated: Option<String>,

    tokens: Vec<Token>,
    pos: usize,
    lino: u32,

    stack: Vec<Value>,
    root: Option<Value>,
    comment: Option<String>,
    pub(crate) tclasses: IndexMap<String, TClass>,
    pub(crate) imports: IndexMap<String, String>,
    used: FxHashSet<String>,
}

impl<'a> Parser<'a> {
    /// Creates a parser.
    pub fn new(
        filename: &str,
        options: &'a ParseOptions,
        reporter: &'a mut dyn Reporter,
        tracker: &'a mut ImportTracker,
        is_import: bool,
    ) -> Self {
        Self {
            filename: filename.to_string(),
            short_filename: basename(filename),
            options,
            reporter,
            tracker,
            is_import,
            activated: None,
            tokens: Vec::new(),
            pos: 0,
            lino: 0,
            stack: Vec::new(),
            root: None,
            comment: None,
            tclasses: IndexMap::new(),
            imports: IndexMap::new(),
            used: FxHashSet::default(),
        }
    }

    /// Parses `tokens` into a document carrying `custom` in its header.
    pub fn parse(mut self, tokens: Vec<Token>, custom: String) -> Result<Uxf> {
        self.tokens = tokens;
        self.register_source()?;
        self.parse_file_comment();
        self.parse_imports()?;
        self.parse_tclasses()?;
        self.parse_values()?;
        if !self.is_import {
            self.check_tclasses();
        }
        if let Some(source) = self.activated.take() {
            self.tracker.finish(&source);
        }
        let mut uxo = match self.root.take() {
            Some(value) => Uxf::new(value)?,
            None => Uxf::default(),
        };
        uxo.custom = custom;
        uxo.comment = self.comment.take();
        uxo.tclasses = std::mem::take(&mut self.tclasses);
        uxo.imports = std::mem::take(&mut self.imports);
        Ok(uxo)
    }

    /// Registers this document with the import tracker so a cycle that
    /// re-enters it fails instead of recursing forever.
    fn register_source(&mut self) -> Result<()> {
        if self.filename == "-" || self.filename.starts_with("http") {
            return Ok(());
        }
        let source = full_filename(&self.filename, None)
            .to_string_lossy()
            .into_owned();
        if self.tracker.is_active(&source) {
            return Err(self.fatal(
                codes::CIRCULAR_IMPORT,
                format!("cannot do circular imports {source:?}"),
            ));
        }
        self.tracker.activate(&source);
        self.activated = Some(source);
        Ok(())
    }

    // ---------------------------------------------------------------- phases

    /// Phase 1: the optional document comment.
    fn parse_file_comment(&mut self) {
        if let Some(Token {
            kind: TokenKind::Comment(comment),
            ..
        }) = self.tokens.first()
        {
            self.comment = Some(comment.clone());
            self.tokens.remove(0);
        }
    }

    /// Phase 2: resolve every import and merge its tclasses.
    fn parse_imports(&mut self) -> Result<()> {
        let imports: Vec<(usize, u32, String)> = self
            .tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| match &token.kind {
                TokenKind::Import(value) => Some((i, token.lino, value.clone())),
                _ => None,
            })
            .collect();
        let mut offset = 0;
        for (index, lino, value) in imports {
            self.lino = lino;
            self.handle_import(&value)?;
            offset = index + 1;
        }
        self.tokens.drain(..offset);
        Ok(())
    }

    /// Phase 3: the tclass definitions.
    fn parse_tclasses(&mut self) -> Result<()> {
        let mut builder: Option<TClassBuilder> = None;
        let mut offset = 0;
        for index in 0..self.tokens.len() {
            let token = self.tokens[index].clone();
            self.lino = token.lino;
            match token.kind {
                TokenKind::TClassBegin => {
                    if let Some(done) = builder.take() {
                        self.commit_tclass(done, codes::UNNAMED_TCLASS, codes::CONFLICTING_TTYPE)?;
                    }
                    builder = Some(TClassBuilder::default());
                }
                TokenKind::Comment(comment) => match builder.as_mut() {
                    Some(builder) => builder.comment = Some(comment),
                    None => break,
                },
                TokenKind::Identifier(name) => {
                    let Some(current) = builder.as_mut() else {
                        return Err(self.fatal(
                            codes::MISSING_TCLASS_EQUALS,
                            "missing ttype; is an `=` missing?",
                        ));
                    };
                    if current.ttype.is_none() {
                        if let Err(err) = ident::check_name(&name) {
                            return Err(self.refatal(err));
                        }
                        current.ttype = Some(name);
                    } else {
                        let field = match Field::new(&name, None) {
                            Ok(field) => field,
                            Err(err) => return Err(self.refatal(err)),
                        };
                        current.fields.push(field);
                    }
                }
                TokenKind::Type(ref vtype) => {
                    let has_fields = builder
                        .as_ref()
                        .is_some_and(|builder| !builder.fields.is_empty());
                    if !has_fields {
                        return Err(self.fatal(
                            codes::TTYPE_IS_BUILTIN,
                            format!(
                                "cannot use a built-in type name or constant as a tclass \
                                 name, got {token}"
                            ),
                        ));
                    }
                    if let Some(field) = builder
                        .as_mut()
                        .and_then(|builder| builder.fields.last_mut())
                    {
                        field.vtype = Some(vtype.clone());
                    }
                }
                TokenKind::TClassEnd => {
                    if let Some(done) = builder.take() {
                        self.commit_tclass(
                            done,
                            codes::UNNAMED_TCLASS_AT_END,
                            codes::CONFLICTING_TTYPE_AT_END,
                        )?;
                    }
                    offset = index + 1;
                }
                _ => break,
            }
        }
        self.tokens.drain(..offset);
        Ok(())
    }

    /// Phase 4: the value tree.
    fn parse_values(&mut self) -> Result<()> {
        while self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            self.lino = token.lino;
            if self.root.is_none()
                && self.stack.is_empty()
                && !token.kind.is_collection_begin()
                && token.kind != TokenKind::Eof
            {
                return Err(self.fatal(
                    codes::EXPECTED_COLLECTION,
                    format!("expected a map, list, or table, got {token}"),
                ));
            }
            match &token.kind {
                kind if kind.is_collection_begin() => self.on_collection_start(kind)?,
                kind if kind.is_collection_end() => self.on_collection_end(kind)?,
                TokenKind::Comment(comment) => self.handle_comment(comment.clone()),
                TokenKind::Identifier(name) => self.handle_identifier(&name.clone(), &token)?,
                TokenKind::Type(name) => self.handle_type(&name.clone(), &token)?,
                TokenKind::Str(value) => self.handle_str(value.clone())?,
                kind if kind.is_scalar() => {
                    let value = scalar_value(kind);
                    self.handle_scalar(value)?;
                }
                TokenKind::Eof => break,
                _ => self.error(
                    codes::UNEXPECTED_TOKEN,
                    format!("unexpected token, got {token}"),
                ),
            }
            self.pos += 1;
        }
        Ok(())
    }

    // ------------------------------------------------------------- tclasses

    fn commit_tclass(
        &mut self,
        builder: TClassBuilder,
        unnamed_code: u16,
        conflict_code: u16,
    ) -> Result<()> {
        let Some(ttype) = builder.ttype else {
            return Err(self.fatal(unnamed_code, "TClass without ttype"));
        };
        let mut tclass = match TClass::new(ttype, builder.fields) {
            Ok(tclass) => tclass,
            Err(err) => return Err(self.refatal(err)),
        };
        tclass.comment = builder.comment;
        self.merge_tclass(tclass, conflict_code)
    }

    /// Adds `tclass` to the registry: first definitions register, identical
    /// duplicates merge (the later comment wins), conflicts are fatal.
    pub(crate) fn merge_tclass(&mut self, tclass: TClass, conflict_code: u16) -> Result<()> {
        let existing_key = self
            .tclasses
            .keys()
            .find(|key| key.eq_ignore_ascii_case(tclass.ttype()))
            .cloned();
        match existing_key {
            None => {
                self.tclasses.insert(tclass.ttype().to_string(), tclass);
            }
            Some(key) => {
                let existing = &self.tclasses[&key];
                if *existing == tclass {
                    if tclass.comment.is_some() && tclass.comment != existing.comment {
                        self.tclasses[&key].comment = tclass.comment;
                    }
                } else {
                    return Err(self.fatal(
                        conflict_code,
                        format!("conflicting ttype definitions for {}", tclass.ttype()),
                    ));
                }
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------- values

    fn on_collection_start(&mut self, kind: &TokenKind) -> Result<()> {
        if self.stack.len() >= self.options.max_depth {
            return Err(self.fatal(
                codes::DEPTH_EXCEEDED,
                format!(
                    "collections nested deeper than {} levels",
                    self.options.max_depth
                ),
            ));
        }
        let value = match kind {
            TokenKind::MapBegin => Value::Map(Map::new()),
            TokenKind::ListBegin => Value::List(List::new()),
            _ => Value::Table(Table::unbound()),
        };
        if self.stack.is_empty() {
            if self.root.is_some() {
                self.error(
                    codes::UNEXPECTED_TOKEN,
                    "only one root collection is allowed",
                );
            }
        } else if let Some(message) = self.typecheck_kind(value.type_name()) {
            self.error(codes::COLLECTION_TYPE_MISMATCH, message);
        }
        self.stack.push(value);
        Ok(())
    }

    fn on_collection_end(&mut self, kind: &TokenKind) -> Result<()> {
        let Some(top) = self.stack.last() else {
            return Err(self.fatal(
                codes::UNMATCHED_COLLECTION_END,
                format!(
                    "unexpected {} suggests unmatched map, list, or table start/end pair",
                    kind.name()
                ),
            ));
        };
        let (expected, closer) = match top {
            Value::List(_) => (TokenKind::ListEnd, ']'),
            Value::Map(_) => (TokenKind::MapEnd, '}'),
            _ => (TokenKind::TableEnd, ')'),
        };
        if *kind != expected {
            self.error(
                codes::MISMATCHED_COLLECTION_END,
                format!("expected {closer:?}, got {}", kind.name()),
            );
        }
        let popped = match self.stack.pop() {
            Some(popped) => popped,
            None => return Ok(()),
        };
        if self.stack.is_empty() {
            if self.root.is_none() {
                self.root = Some(popped);
            }
        } else {
            self.append_to_top(popped)?;
        }
        Ok(())
    }

    fn handle_comment(&mut self, comment: String) {
        let after_opener = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .is_some_and(|token| token.kind.is_collection_begin());
        if !after_opener {
            self.error(
                codes::MISPLACED_PARSER_COMMENT,
                "comments may only be put at the beginning of a map, list, or table",
            );
            return;
        }
        match self.stack.last_mut() {
            Some(Value::List(list)) => list.comment = Some(comment),
            Some(Value::Map(map)) => map.comment = Some(comment),
            Some(Value::Table(table)) => table.comment = Some(comment),
            _ => self.error(codes::UNEXPECTED_TOKEN, "comment outside any collection"),
        }
    }

    fn handle_identifier(&mut self, name: &str, token: &Token) -> Result<()> {
        if self.stack.is_empty() {
            self.error(
                codes::UNEXPECTED_TOKEN,
                format!("unexpected token, got {token}"),
            );
            return Ok(());
        }
        let prev = self.kind_before(1).cloned();
        let prev2 = self.kind_before(2).cloned();
        let prev3 = self.kind_before(3).cloned();
        let follows = |prev: &Option<TokenKind>, further: &Option<TokenKind>, opener: TokenKind| {
            *prev == Some(opener.clone())
                || (matches!(prev, Some(TokenKind::Comment(_))) && *further == Some(opener))
        };

        if matches!(prev, Some(TokenKind::Type(_)))
            && follows(&prev2, &prev3, TokenKind::MapBegin)
        {
            // the identifier is a map's vtype, naming a ttype
            match self.tclasses.get(name) {
                None => self.error(
                    codes::EXPECTED_MAP_VTYPE,
                    format!("expected map vtype, got {token}"),
                ),
                Some(tclass) => {
                    let ttype = tclass.ttype().to_string();
                    if let Some(Value::Map(map)) = self.stack.last_mut() {
                        map.vtype = Some(ttype.clone());
                    }
                    self.used.insert(ttype);
                }
            }
        } else if follows(&prev, &prev2, TokenKind::ListBegin) {
            match self.tclasses.get(name) {
                None => self.error(
                    codes::EXPECTED_LIST_VTYPE,
                    format!("expected list vtype, got {token}"),
                ),
                Some(tclass) => {
                    let ttype = tclass.ttype().to_string();
                    if let Some(Value::List(list)) = self.stack.last_mut() {
                        list.vtype = Some(ttype.clone());
                    }
                    self.used.insert(ttype);
                }
            }
        } else if follows(&prev, &prev2, TokenKind::TableBegin) {
            self.bind_table_ttype(name, token)?;
        } else if name.eq_ignore_ascii_case("true") || name.eq_ignore_ascii_case("false") {
            self.error(
                codes::BOOL_LITERAL,
                "boolean values are represented by yes or no",
            );
        } else {
            self.error(
                codes::MISPLACED_IDENTIFIER,
                format!(
                    "ttypes may only appear at the start of a map (as the value type), \
                     list, or table, {token}"
                ),
            );
        }
        Ok(())
    }

    /// Binds the ttype after a table's `(` and checks it against any outer
    /// container constraint.
    fn bind_table_ttype(&mut self, name: &str, token: &Token) -> Result<()> {
        let Some(tclass) = self.tclasses.get(name).cloned() else {
            // a table with no tclass is invalid
            return Err(self.fatal(
                codes::EXPECTED_TABLE_TTYPE,
                format!("expected table ttype, got {token}"),
            ));
        };
        let ttype = tclass.ttype().to_string();
        if let Some(Value::Table(table)) = self.stack.last_mut() {
            table.set_tclass(tclass);
        }
        self.used.insert(ttype.clone());
        if self.stack.len() > 1 {
            let outer_vtype = match &self.stack[self.stack.len() - 2] {
                Value::List(list) => list.vtype.clone(),
                Value::Map(map) => map.vtype.clone(),
                _ => None,
            };
            if let Some(vtype) = outer_vtype {
                if vtype != "table" && !vtype.eq_ignore_ascii_case(&ttype) {
                    self.error(
                        codes::TABLE_VTYPE_MISMATCH,
                        format!("expected table value of type {vtype}, got value of type {ttype}"),
                    );
                }
            }
        }
        Ok(())
    }

    fn handle_type(&mut self, name: &str, token: &Token) -> Result<()> {
        let result = match self.stack.last_mut() {
            None => {
                self.error(
                    codes::UNEXPECTED_TOKEN,
                    format!("unexpected token, got {token}"),
                );
                return Ok(());
            }
            Some(Value::List(list)) => {
                if list.vtype.is_some() {
                    Err(format!(
                        "can only have at most one vtype for a list, got {token}"
                    ))
                } else {
                    list.vtype = Some(name.to_string());
                    Ok(())
                }
            }
            Some(Value::Map(map)) => {
                if map.ktype().is_none() {
                    match map.set_ktype(name) {
                        Ok(()) => Ok(()),
                        Err(err) => return Err(self.refatal(err)),
                    }
                } else if map.vtype.is_none() {
                    map.vtype = Some(name.to_string());
                    Ok(())
                } else {
                    Err(format!(
                        "can only have at most one ktype and one vtype for a map, got {token}"
                    ))
                }
            }
            Some(_) => {
                self.error(
                    codes::MISPLACED_TYPE,
                    format!("ktypes and vtypes are only allowed at the start of maps and lists, got {token}"),
                );
                return Ok(());
            }
        };
        if let Err(message) = result {
            let code = match self.stack.last() {
                Some(Value::List(_)) => codes::LIST_VTYPE_REPEATED,
                _ => codes::MAP_TYPES_REPEATED,
            };
            self.error(code, message);
        }
        Ok(())
    }

    fn handle_str(&mut self, value: String) -> Result<()> {
        let mut value = Value::Str(value);
        if let Some((vtype, message)) = self.typecheck_value(&value) {
            let naturalizable = matches!(
                vtype.as_str(),
                "bool" | "int" | "real" | "date" | "datetime"
            );
            let original = match &value {
                Value::Str(s) => s.clone(),
                _ => String::new(),
            };
            match naturalize(&vtype, &original) {
                Some(new_value) if naturalizable => {
                    self.error(
                        codes::NATURALIZED,
                        format!("converted str {original:?} to {vtype}"),
                    );
                    value = new_value;
                }
                _ => self.error(codes::TYPE_MISMATCH, message),
            }
        }
        self.append_to_top(value)
    }

    fn handle_scalar(&mut self, value: Value) -> Result<()> {
        let mut value = value;
        if let Some((vtype, message)) = self.typecheck_value(&value) {
            match (vtype.as_str(), &value) {
                ("real", Value::Int(i)) => {
                    let real = *i as f64;
                    self.error(
                        codes::INT_WIDENED,
                        format!("converted int {i} to real {real}"),
                    );
                    value = Value::Real(real);
                }
                ("int", Value::Real(r)) => {
                    let int = r.round() as i64;
                    self.error(
                        codes::REAL_NARROWED,
                        format!("converted real {r} to int {int}"),
                    );
                    value = Value::Int(int);
                }
                _ => self.error(codes::TYPE_MISMATCH, message),
            }
        }
        self.append_to_top(value)
    }

    fn append_to_top(&mut self, value: Value) -> Result<()> {
        let result = match self.stack.last_mut() {
            None => {
                self.error(codes::UNEXPECTED_TOKEN, "value outside any collection");
                return Ok(());
            }
            Some(Value::List(list)) => {
                list.push(value);
                Ok(())
            }
            Some(Value::Map(map)) => map.push(value),
            Some(Value::Table(table)) => table.push(value),
            Some(_) => Ok(()),
        };
        result.map_err(|err| self.refatal(err))
    }

    // ------------------------------------------------------------ typecheck

    /// The constraint the next value on the current top of stack must
    /// satisfy.
    fn expected_vtype(&self) -> Option<String> {
        match self.stack.last()? {
            Value::List(list) => list.vtype.clone(),
            Value::Map(map) => {
                if map.next_is_key() {
                    map.ktype().map(str::to_string)
                } else {
                    map.vtype.clone()
                }
            }
            Value::Table(table) => table.next_vtype().map(str::to_string),
            _ => None,
        }
    }

    /// Checks `value` against the current constraint, returning the
    /// constraint and a message on mismatch.
    fn typecheck_value(&self, value: &Value) -> Option<(String, String)> {
        if matches!(value, Value::Null) {
            return None;
        }
        let vtype = self.expected_vtype()?;
        let mismatch = if ident::is_any_value_type_name(&vtype) {
            !value.satisfies_builtin(&vtype)
        } else {
            // an unknown ttype never matches; a known one is checked when
            // the table binds its tclass
            !self.tclasses.contains_key(&vtype)
        };
        if mismatch {
            let message = format!("expected {vtype}, got {} {}", value.type_name(), brief(value));
            Some((vtype, message))
        } else {
            None
        }
    }

    /// Like [`typecheck_value`](Self::typecheck_value) for a collection
    /// whose contents are not known yet.
    fn typecheck_kind(&self, kind_name: &str) -> Option<String> {
        let vtype = self.expected_vtype()?;
        let mismatch = if ident::is_any_value_type_name(&vtype) {
            vtype != kind_name
        } else {
            !self.tclasses.contains_key(&vtype)
        };
        if mismatch {
            Some(format!("expected {vtype}, got {kind_name}"))
        } else {
            None
        }
    }

    // -------------------------------------------------------------- cleanup

    /// Phase 5: registry cleanup and unused/undefined reporting.
    fn check_tclasses(&mut self) {
        let mut imported: FxHashSet<String> = self.imports.keys().cloned().collect();
        if self.options.replace_imports {
            self.replace_imports(&mut imported);
        }
        let mut defined: FxHashSet<String> = self.tclasses.keys().cloned().collect();
        if self.options.drop_unused {
            self.drop_unused(&mut defined);
        }
        let mut unused: Vec<&String> = defined
            .iter()
            .filter(|ttype| !self.used.contains(*ttype))
            .filter(|ttype| !imported.contains(*ttype))
            .filter(|ttype| {
                self.tclasses
                    .get(*ttype)
                    .is_some_and(|tclass| !tclass.is_fieldless())
            })
            .collect();
        unused.sort();
        if !unused.is_empty() {
            let (code, what) = if unused.len() == 1 {
                (codes::UNUSED_TTYPE, "unused ttype")
            } else {
                (codes::UNUSED_TTYPES, "unused ttypes")
            };
            let names = unused
                .iter()
                .map(|name| format!("{name:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            self.error(code, format!("{what}: {names}"));
        }
        let mut undefined: Vec<String> = self
            .used
            .iter()
            .filter(|ttype| !defined.contains(*ttype))
            .cloned()
            .collect();
        undefined.sort();
        if !undefined.is_empty() {
            let what = if undefined.len() == 1 {
                "undefined ttype"
            } else {
                "undefined ttypes"
            };
            let names = undefined
                .iter()
                .map(|name| format!("{name:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            self.error(codes::UNDEFINED_TTYPE, format!("{what}: {names}"));
        }
    }

    /// Drops unused imported definitions and makes the rest local.
    fn replace_imports(&mut self, imported: &mut FxHashSet<String>) {
        for ttype in imported.iter() {
            if !self.used.contains(ttype) {
                self.tclasses.shift_remove(ttype);
            }
        }
        self.imports.clear();
        imported.clear();
    }

    /// Drops unused definitions and any imports left with nothing to
    /// contribute.
    fn drop_unused(&mut self, defined: &mut FxHashSet<String>) {
        let mut ttypes_for_filename: IndexMap<String, FxHashSet<String>> = IndexMap::new();
        for (ttype, filename) in &self.imports {
            ttypes_for_filename
                .entry(filename.clone())
                .or_default()
                .insert(ttype.clone());
        }
        let all_ttypes: Vec<String> = self.tclasses.keys().cloned().collect();
        for ttype in all_ttypes {
            if !self.used.contains(&ttype) {
                self.tclasses.shift_remove(&ttype);
                defined.remove(&ttype);
                for ttypes in ttypes_for_filename.values_mut() {
                    ttypes.remove(&ttype);
                }
            }
        }
        for (filename, ttypes) in &ttypes_for_filename {
            if ttypes.is_empty() {
                self.imports.retain(|_, import| import != filename);
            }
        }
    }

    // -------------------------------------------------------------- helpers

    fn kind_before(&self, back: usize) -> Option<&TokenKind> {
        self.pos.checked_sub(back).map(|i| &self.tokens[i].kind)
    }

    pub(crate) fn error(&mut self, code: u16, message: impl Into<String>) {
        emit(self.reporter, &self.short_filename, self.lino, code, message);
    }

    pub(crate) fn fatal(&mut self, code: u16, message: impl Into<String>) -> Error {
        emit_fatal(self.reporter, &self.short_filename, self.lino, code, message)
    }

    /// Re-reports a model-level constraint error at the current position.
    fn refatal(&mut self, err: Error) -> Error {
        match err {
            Error::Parse { code, message, .. } => self.fatal(code, message),
            other => other,
        }
    }
}

/// A tclass definition under construction.
#[derive(Default)]
struct TClassBuilder {
    ttype: Option<String>,
    fields: Vec<Field>,
    comment: Option<String>,
}

/// The value carried by a scalar token.
fn scalar_value(kind: &TokenKind) -> Value {
    match kind {
        TokenKind::Null => Value::Null,
        TokenKind::Bool(b) => Value::Bool(*b),
        TokenKind::Int(i) => Value::Int(*i),
        TokenKind::Real(r) => Value::Real(*r),
        TokenKind::Date(d) => Value::Date(*d),
        TokenKind::DateTime(dt) => Value::DateTime(*dt),
        TokenKind::Bytes(b) => Value::Bytes(b.clone()),
        TokenKind::Str(s) => Value::Str(s.clone()),
        _ => Value::Null,
    }
}

/// A short rendering of `value` for diagnostics.
fn brief(value: &Value) -> String {
    match value {
        Value::Null => "?".to_string(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        Value::Str(s) => format!("<{s}>"),
        Value::Bytes(b) => format!("{} bytes", b.len()),
        other => other.type_name().to_string(),
    }
}

/// Coerces `text` to the declared scalar type, or `None` when it does not
/// parse as that exact type.
fn naturalize(vtype: &str, text: &str) -> Option<Value> {
    match vtype {
        "bool" => match text.to_ascii_uppercase().as_str() {
            "T" | "TRUE" | "Y" | "YES" => Some(Value::Bool(true)),
            "F" | "FALSE" | "N" | "NO" => Some(Value::Bool(false)),
            _ => None,
        },
        "int" => text.trim().parse::<i64>().ok().map(Value::Int),
        "real" => text.trim().parse::<f64>().ok().map(Value::Real),
        "date" => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .ok()
            .map(Value::Date),
        "datetime" => {
            let text = text.trim();
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(Value::DateTime)
        }
        _ => None,
    }
}

/// The base name of `filename`, used in diagnostics.
fn basename(filename: &str) -> String {
    std::path::Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename)
        .to_string()
}
