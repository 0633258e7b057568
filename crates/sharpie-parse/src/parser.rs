use drop_bomb::DropBomb;
use sharpie_errors::{Diagnostic, ErrorCode};
use sharpie_syntax::SyntaxKind::{self, *};
use sharpie_syntax::{Builder, SyntaxSet, SyntaxTree};
use sharpie_tokenizer::{TokenIndex, Tokenizer};
use text_size::{TextRange, TextSize};

use crate::options::{Feature, LanguageVersion};

/// Nesting limit for the grammar functions that recurse.
const MAX_DEPTH: u32 = 128;

/// Per-function state that changes what contextual keywords mean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Context {
    pub(crate) is_async: bool,
    pub(crate) in_query: bool,
}

pub(crate) struct Parser<'t> {
    tokenizer: Tokenizer<'t>,
    version: LanguageVersion,
    /// Index of the current token.
    pos: TokenIndex,
    /// Number of tokens the tokenizer has produced so far.
    scanned: u32,
    events: Vec<Event>,
    context: Context,
    depth: u32,
    overflow: Option<TextRange>,
    /// End of the last consumed token, excluding its trivia.
    prev_end: TextSize,
    last_missing: Option<TextSize>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokenizer: Tokenizer<'t>, version: LanguageVersion) -> Self {
        Self {
            tokenizer,
            version,
            pos: 0,
            scanned: 0,
            events: Vec::new(),
            context: Context::default(),
            depth: 0,
            overflow: None,
            prev_end: TextSize::new(0),
            last_missing: None,
        }
    }

    fn index(&mut self, n: u32) -> TokenIndex {
        let target = self.pos + n;
        while self.scanned <= target {
            let index = self.tokenizer.next_token_index();
            if index < self.scanned {
                return index;
            }
            self.scanned = index + 1;
        }
        target
    }

    pub(crate) fn nth(&mut self, n: u32) -> SyntaxKind {
        if self.overflow.is_some() {
            return EOF;
        }
        let index = self.index(n);
        self.tokenizer.token(index).kind
    }

    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.nth(0)
    }

    /// Contextual keyword spelled by the `n`th token, `IDENT` if none.
    pub(crate) fn nth_contextual(&mut self, n: u32) -> SyntaxKind {
        if self.overflow.is_some() {
            return EOF;
        }
        let index = self.index(n);
        self.tokenizer.token(index).contextual_kind
    }

    pub(crate) fn nth_at(&mut self, n: u32, kind: SyntaxKind) -> bool {
        if kind.is_contextual_keyword() {
            self.nth(n) == IDENT && self.nth_contextual(n) == kind
        } else {
            self.nth(n) == kind
        }
    }

    pub(crate) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.nth_at(0, kind)
    }

    pub(crate) fn at_ts(&mut self, set: SyntaxSet) -> bool {
        let kind = self.current();
        set.contains(kind)
    }

    pub(crate) fn nth_text(&mut self, n: u32) -> &'t str {
        let index = self.index(n);
        self.tokenizer.token_text(index)
    }

    pub(crate) fn nth_range(&mut self, n: u32) -> TextRange {
        let index = self.index(n);
        self.tokenizer.token(index).range
    }

    pub(crate) fn current_range(&mut self) -> TextRange {
        self.nth_range(0)
    }

    /// Whether the `n`th token is immediately followed by the next one, with
    /// no trivia in between.
    pub(crate) fn nth_joined(&mut self, n: u32) -> bool {
        let end = self.nth_range(n).end();
        self.nth_range(n + 1).start() == end && self.nth(n + 1) != EOF
    }

    pub(crate) fn context(&self) -> Context {
        self.context
    }

    /// Runs `f` with another context and restores the current one afterwards.
    pub(crate) fn with_context<T>(&mut self, context: Context, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.context, context);
        let result = f(self);
        self.context = saved;
        result
    }

    /// Runs a grammar function that may recurse into itself. Past the depth
    /// limit the parse is abandoned: every lookahead reports end-of-file so
    /// all callers unwind quickly.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        if self.depth > MAX_DEPTH && self.overflow.is_none() {
            let range = self.current_range();
            tracing::debug!(depth = self.depth, ?range, "nesting limit reached, abandoning parse");
            self.overflow = Some(range);
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// How many more levels a lookahead scan may descend before it hits
    /// the same limit as [`Parser::nested`].
    pub(crate) fn scan_budget(&self) -> u32 {
        MAX_DEPTH.saturating_sub(self.depth)
    }

    /// Abandons the parse because a lookahead scan ran out of budget.
    pub(crate) fn scan_overflowed(&mut self, n: u32) {
        if self.overflow.is_none() {
            let range = self.nth_range(n);
            tracing::debug!(?range, "lookahead nesting limit reached, abandoning parse");
            self.overflow = Some(range);
        }
    }

    /// End of the last consumed token, excluding its trivia.
    pub(crate) fn prev_end(&self) -> TextSize {
        self.prev_end
    }

    /// Position used to detect that a loop body made no progress.
    pub(crate) fn position(&self) -> TokenIndex {
        self.pos
    }

    pub(crate) fn bump(&mut self) {
        let kind = self.current();
        self.bump_as(kind);
    }

    /// Consumes the current token as `kind`; used for contextual keywords.
    pub(crate) fn bump_as(&mut self, kind: SyntaxKind) {
        self.bump_joined(kind, 1);
    }

    /// Consumes `n_raw` adjacent tokens as one token of `kind`.
    pub(crate) fn bump_joined(&mut self, kind: SyntaxKind, n_raw: u8) {
        if self.current() == EOF {
            return;
        }
        let end = self.nth_range(u32::from(n_raw) - 1).end();
        self.pos += u32::from(n_raw);
        self.prev_end = end;
        self.last_missing = None;
        self.events.push(Event::Token { kind, n_raw });
    }

    /// Consumes the end-of-file token, which closes every root.
    pub(crate) fn bump_eof(&mut self) {
        debug_assert_eq!(self.current(), EOF);
        self.events.push(Event::Token { kind: EOF, n_raw: 1 });
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.bump_as(kind);
        true
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.missing(kind);
        false
    }

    /// Inserts a missing token of `kind` and reports it.
    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.error_expected(kind);
        self.missing_silent(kind);
    }

    /// Inserts a missing token whose diagnostic is reported elsewhere.
    pub(crate) fn missing_silent(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Missing { kind });
    }

    /// Reports that `kind` was expected at the end of the previous token.
    pub(crate) fn error_expected(&mut self, kind: SyntaxKind) {
        let at = self.prev_end;
        if self.last_missing == Some(at) {
            return;
        }
        self.last_missing = Some(at);
        let range = TextRange::empty(at);
        let diagnostic = match kind {
            IDENT => Diagnostic::new(ErrorCode::IdentifierExpected, range),
            SEMICOLON => Diagnostic::new(ErrorCode::SemicolonExpected, range),
            RIGHT_PAREN => Diagnostic::new(ErrorCode::CloseParenExpected, range),
            RIGHT_BRACE => Diagnostic::new(ErrorCode::RbraceExpected, range),
            LEFT_BRACE => Diagnostic::new(ErrorCode::LbraceExpected, range),
            IN_KW => Diagnostic::new(ErrorCode::InExpected, range),
            _ => Diagnostic::with_argument(
                ErrorCode::SyntaxError,
                range,
                kind.text().unwrap_or_else(|| kind.display_name()),
            ),
        };
        self.push_error(diagnostic);
    }

    /// Reports `code` at the end of the previous token, once per position.
    pub(crate) fn error_missing(&mut self, code: ErrorCode) {
        let at = self.prev_end;
        if self.last_missing == Some(at) {
            return;
        }
        self.last_missing = Some(at);
        self.error(code, TextRange::empty(at));
    }

    /// Explicitly absent optional slot.
    pub(crate) fn empty(&mut self) {
        self.events.push(Event::Empty);
    }

    /// Turns the current token into skipped trivia.
    pub(crate) fn skip(&mut self) {
        if self.current() == EOF {
            return;
        }
        self.pos += 1;
        self.events.push(Event::Skip { n_raw: 1 });
    }

    pub(crate) fn push_error(&mut self, diagnostic: Diagnostic) {
        self.events.push(Event::Error(Box::new(diagnostic)));
    }

    pub(crate) fn error(&mut self, code: ErrorCode, range: TextRange) {
        self.push_error(Diagnostic::new(code, range));
    }

    pub(crate) fn error_with(&mut self, code: ErrorCode, range: TextRange, argument: &str) {
        self.push_error(Diagnostic::with_argument(code, range, argument));
    }

    /// Reports `code` on the current token, with its text as the argument
    /// when the message takes one.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode) {
        let range = self.current_range();
        if code.template().contains("{0}") {
            let text = match self.current() {
                EOF => "end-of-file",
                _ => self.nth_text(0),
            };
            self.error_with(code, range, text);
        } else {
            self.error(code, range);
        }
    }

    /// Flags `feature` when the language version predates it.
    pub(crate) fn feature(&mut self, feature: Feature, range: TextRange) {
        if self.version.supports(feature) {
            return;
        }
        let required = feature.required_version().to_string();
        self.push_error(Diagnostic::with_arguments(
            self.version.unavailable_code(),
            range,
            [feature.name(), &required],
        ));
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn build_tree(self, root: SyntaxKind) -> SyntaxTree {
        let Parser { mut tokenizer, mut events, overflow, .. } = self;
        let mut builder = Builder::new(tokenizer.text());

        if let Some(range) = overflow {
            return overflowed_tree(&mut tokenizer, builder, root, range);
        }

        let mut forward_parents = Vec::new();
        let mut opened_lists = Vec::new();
        let mut raw = 0;

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent, empty_slots } => {
                    if kind == TOMBSTONE {
                        continue;
                    }

                    forward_parents.push((kind, empty_slots));
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent, empty_slots } => {
                                if kind != TOMBSTONE {
                                    forward_parents.push((kind, empty_slots));
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for (kind, empty_slots) in forward_parents.drain(..).rev() {
                        if kind == LIST {
                            builder.start_list();
                        } else {
                            builder.start_node(kind);
                        }
                        opened_lists.push(kind == LIST);
                        for _ in 0..empty_slots {
                            builder.empty();
                        }
                    }
                }
                Event::Finish => match opened_lists.pop() {
                    Some(true) => builder.finish_list(),
                    _ => builder.finish_node(),
                },
                Event::Token { kind, n_raw } => {
                    let first = raw;
                    raw += u32::from(n_raw);
                    let last = raw - 1;
                    for index in first..=last {
                        for diagnostic in tokenizer.diagnostics(index) {
                            builder.error(diagnostic.clone());
                        }
                    }
                    let start = tokenizer.token(first).range.start();
                    let end = tokenizer.token(last).range.end();
                    builder.token(
                        tokenizer.leading_trivia(first),
                        kind,
                        end - start,
                        tokenizer.trailing_trivia(last),
                    );
                    if n_raw == 1
                        && let Some(value) = &tokenizer.token(first).value
                    {
                        builder.value(value.clone());
                    }
                }
                Event::Skip { n_raw } => {
                    for _ in 0..n_raw {
                        for diagnostic in tokenizer.diagnostics(raw) {
                            builder.error(diagnostic.clone());
                        }
                        let range = tokenizer.token(raw).range;
                        builder.skipped(
                            tokenizer.leading_trivia(raw),
                            range.len(),
                            tokenizer.trailing_trivia(raw),
                        );
                        raw += 1;
                    }
                }
                Event::Missing { kind } => builder.missing(kind),
                Event::Empty => builder.empty(),
                Event::Error(diagnostic) => builder.error(*diagnostic),
            }
        }

        builder.finish()
    }
}

/// Tree produced when nesting got too deep: `root` keeps its usual shape
/// with missing content, and every token becomes skipped text of the
/// end-of-file token.
fn overflowed_tree(
    tokenizer: &mut Tokenizer<'_>,
    mut builder: Builder,
    root: SyntaxKind,
    range: TextRange,
) -> SyntaxTree {
    builder.start_node(root);
    builder.error(Diagnostic::new(ErrorCode::InsufficientStack, range));
    match root {
        EXPRESSION_ROOT => missing_name(&mut builder),
        STATEMENT_ROOT => {
            builder.start_node(EXPRESSION_STATEMENT);
            missing_name(&mut builder);
            builder.missing(SEMICOLON);
            builder.finish_node();
        }
        _ => {
            for _ in 0..4 {
                builder.start_list();
                builder.finish_list();
            }
        }
    }
    let mut index = 0;
    loop {
        let produced = tokenizer.next_token_index();
        while index < produced {
            let range = tokenizer.token(index).range;
            builder.skipped(
                tokenizer.leading_trivia(index),
                range.len(),
                tokenizer.trailing_trivia(index),
            );
            index += 1;
        }
        if tokenizer.token(produced).kind == EOF {
            builder.token(
                tokenizer.leading_trivia(produced),
                EOF,
                TextSize::new(0),
                tokenizer.trailing_trivia(produced),
            );
            break;
        }
    }
    builder.finish_node();
    builder.finish()
}

fn missing_name(builder: &mut Builder) {
    builder.start_node(IDENTIFIER_NAME);
    builder.missing(IDENT);
    builder.finish_node();
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32>, empty_slots: u8 },
    Finish,
    Token { kind: SyntaxKind, n_raw: u8 },
    Missing { kind: SyntaxKind },
    Empty,
    Skip { n_raw: u8 },
    Error(Box<Diagnostic>),
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: TOMBSTONE, forward_parent: None, empty_slots: 0 };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker { position: pos, bomb: DropBomb::new("Marker must be either completed or abandoned") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position, kind)
    }

    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();
        if self.position as usize == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Start { kind: TOMBSTONE, forward_parent: None, .. }) => {}
                _ => unreachable!(),
            }
        }
    }

    /// Completes the marker and demotes everything it covers to skipped
    /// text. Diagnostics reported inside stay, attached to the enclosing
    /// node.
    pub(crate) fn complete_skipped(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();
        for event in &mut p.events[self.position as usize..] {
            match *event {
                Event::Token { n_raw, .. } => *event = Event::Skip { n_raw },
                Event::Start { .. } | Event::Finish | Event::Missing { .. } | Event::Empty => {
                    *event = Event::TOMBSTONE;
                }
                Event::Skip { .. } | Event::Error(_) => {}
            }
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
    kind: SyntaxKind,
}

impl CompletedMarker {
    fn new(pos: u32, kind: SyntaxKind) -> Self {
        CompletedMarker { pos, kind }
    }

    pub(crate) fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }

    /// Like [`CompletedMarker::precede`], with `empty_slots` absent slots
    /// placed before this node inside the new parent.
    pub(crate) fn precede_after_empty(self, p: &mut Parser<'_>, empty_slots: u8) -> Marker {
        let m = self.precede(p);
        match &mut p.events[m.position as usize] {
            Event::Start { empty_slots: slot, .. } => *slot = empty_slots,
            _ => unreachable!(),
        }
        m
    }
}
