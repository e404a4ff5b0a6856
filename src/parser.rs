//! Recursive-descent parser with precedence climbing.
//!
//! A cursor over the token vec with `peek`/`next`, the same shape as most
//! hand-rolled recursive-descent parsers, driving a precedence table for
//! expressions and a leading-keyword dispatch for statements.

use log::trace;

use crate::ast::{ArithOp, CompareOp, Expr, Stmt};
use crate::error::{InterpError, ParseError};
use crate::lexer::Token;

type PResult<T> = Result<T, InterpError>;

struct Cursor {
    tokens: Vec<Token>,
    index: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn peek_is_keyword(&self, text: &str) -> bool {
        matches!(self.peek(), Some(tok) if tok.is_keyword(text))
    }

    fn eat_keyword(&mut self, text: &str) -> bool {
        if self.peek_is_keyword(text) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, text: &str) -> PResult<()> {
        if self.eat_keyword(text) {
            Ok(())
        } else {
            Err(parse_error(format!(
                "expected '{text}', found {:?}",
                self.peek()
            )))
        }
    }

    fn expect_identifier(&mut self) -> PResult<String> {
        match self.next() {
            Some(Token::Identifier(name)) => Ok(name),
            other => Err(parse_error(format!("expected identifier, found {other:?}"))),
        }
    }

    fn expect_int(&mut self) -> PResult<i64> {
        match self.next() {
            Some(Token::IntLiteral(value)) => Ok(value),
            other => Err(parse_error(format!(
                "expected integer literal, found {other:?}"
            ))),
        }
    }
}

fn parse_error(message: String) -> InterpError {
    InterpError::Parse(ParseError::new(message))
}

/// Parses a full program: statements until the token stream is exhausted.
pub(crate) fn parse(tokens: Vec<Token>) -> PResult<Vec<Stmt>> {
    let mut cursor = Cursor::new(tokens);
    let mut stmts = vec![];

    while !cursor.at_end() {
        stmts.push(parse_statement(&mut cursor)?);
    }

    trace!("parsed {} top-level statements", stmts.len());
    Ok(stmts)
}

/// Parses statements until one of the given terminator keywords is seen
/// (used for loop/function/block bodies), leaving the terminator unconsumed.
fn parse_block_body(cursor: &mut Cursor, terminators: &[&str]) -> PResult<Vec<Stmt>> {
    let mut stmts = vec![];
    while !cursor.at_end() && !terminators.iter().any(|t| cursor.peek_is_keyword(t)) {
        stmts.push(parse_statement(cursor)?);
    }
    Ok(stmts)
}

fn parse_statement(cursor: &mut Cursor) -> PResult<Stmt> {
    if cursor.eat_keyword("摆哈儿") {
        cursor.expect_keyword("：")?;
        let expr = parse_expr(cursor)?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::Say(expr));
    }

    if cursor.eat_keyword("看哈儿") {
        cursor.expect_keyword("：")?;
        let condition = parse_expr(cursor)?;
        cursor.expect_keyword("啵？")?;
        cursor.expect_keyword("要是呢话")?;
        let then_branch = Box::new(parse_statement(cursor)?);
        let else_branch = if cursor.eat_keyword("不是呢话") {
            Some(Box::new(parse_statement(cursor)?))
        } else {
            None
        };
        return Ok(Stmt::Conditional {
            condition,
            then_branch,
            else_branch,
        });
    }

    if cursor.eat_keyword("喊") {
        let call = parse_call_after_keyword(cursor)?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::Call(call));
    }

    if cursor.eat_keyword("爬远点") {
        let value = if cursor.peek_is_keyword("。") {
            None
        } else {
            Some(parse_expr(cursor)?)
        };
        cursor.expect_keyword("。")?;
        return Ok(Stmt::Return(value));
    }

    if cursor.eat_keyword("开始：") {
        let body = parse_block_body(cursor, &["刹脚"])?;
        cursor.expect_keyword("刹脚")?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::Block(body));
    }

    // Every remaining statement form starts with a leading identifier.
    let name = cursor.expect_identifier()?;

    if cursor.eat_keyword("凶得很") {
        cursor.expect_keyword("。")?;
        return Ok(Stmt::VarDecl(name));
    }

    if cursor.eat_keyword("巴倒") {
        let value = parse_expr(cursor)?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::Assign { name, value });
    }

    if cursor.eat_keyword("走哈儿") {
        cursor.expect_keyword("。")?;
        return Ok(Stmt::IncBy {
            name,
            delta: Expr::Int(1),
        });
    }

    if cursor.eat_keyword("走") {
        let n = cursor.expect_int()?;
        cursor.expect_keyword("步")?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::IncBy {
            name,
            delta: Expr::Int(n),
        });
    }

    if cursor.eat_keyword("倒起走哈儿") {
        cursor.expect_keyword("。")?;
        return Ok(Stmt::DecBy {
            name,
            delta: Expr::Int(1),
        });
    }

    if cursor.eat_keyword("倒起走") {
        let n = cursor.expect_int()?;
        cursor.expect_keyword("步")?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::DecBy {
            name,
            delta: Expr::Int(n),
        });
    }

    if cursor.eat_keyword("从") {
        let start = parse_expr(cursor)?;
        cursor.expect_keyword("拢")?;
        let end = parse_expr(cursor)?;
        cursor.expect_keyword("打转转儿：")?;
        let body = parse_block_body(cursor, &["转完了"])?;
        cursor.expect_keyword("转完了")?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::Loop {
            counter: name,
            start,
            end,
            body,
        });
    }

    // `Identifier [( params )] 啷个办： <stmts> 刹脚。`: a function definition.
    let params = if cursor.eat_keyword("（") || cursor.eat_keyword("(") {
        let params = parse_param_list(cursor)?;
        cursor.expect_keyword("）").or_else(|_| cursor.expect_keyword(")"))?;
        params
    } else {
        vec![]
    };

    if cursor.eat_keyword("啷个办：") {
        let body = parse_block_body(cursor, &["刹脚"])?;
        cursor.expect_keyword("刹脚")?;
        cursor.expect_keyword("。")?;
        return Ok(Stmt::FuncDef {
            name,
            params,
            body,
        });
    }

    Err(parse_error(format!(
        "unrecognized statement starting with identifier '{name}', found {:?}",
        cursor.peek()
    )))
}

fn parse_param_list(cursor: &mut Cursor) -> PResult<Vec<String>> {
    let mut params = vec![];
    if cursor.peek_is_keyword("）") || cursor.peek_is_keyword(")") {
        return Ok(params);
    }
    loop {
        params.push(cursor.expect_identifier()?);
        if cursor.eat_keyword("，") || cursor.eat_keyword(",") {
            continue;
        }
        break;
    }
    Ok(params)
}

fn parse_arg_list(cursor: &mut Cursor) -> PResult<Vec<Expr>> {
    let mut args = vec![];
    if cursor.peek_is_keyword("）") || cursor.peek_is_keyword(")") {
        return Ok(args);
    }
    loop {
        args.push(parse_expr(cursor)?);
        if cursor.eat_keyword("，") || cursor.eat_keyword(",") {
            continue;
        }
        break;
    }
    Ok(args)
}

/// Called with `喊` already consumed.
fn parse_call_after_keyword(cursor: &mut Cursor) -> PResult<Expr> {
    let callee = cursor.expect_identifier()?;
    let args = if cursor.eat_keyword("（") || cursor.eat_keyword("(") {
        let args = parse_arg_list(cursor)?;
        cursor
            .expect_keyword("）")
            .or_else(|_| cursor.expect_keyword(")"))?;
        args
    } else {
        vec![]
    };
    Ok(Expr::Call { callee, args })
}

/// Top-level expression entry point: Concat, the lowest-precedence level.
fn parse_expr(cursor: &mut Cursor) -> PResult<Expr> {
    let first = parse_comparison(cursor)?;

    if !cursor.peek_is_keyword("、") {
        return Ok(first);
    }

    let mut parts = vec![first];
    while cursor.eat_keyword("、") {
        parts.push(parse_comparison(cursor)?);
    }
    Ok(Expr::Concat(parts))
}

fn parse_comparison(cursor: &mut Cursor) -> PResult<Expr> {
    let lhs = parse_additive(cursor)?;

    if cursor.eat_keyword("比") {
        let rhs = parse_additive(cursor)?;
        let op = if cursor.eat_keyword("大") {
            CompareOp::Greater
        } else if cursor.eat_keyword("小") {
            CompareOp::Less
        } else {
            return Err(parse_error(format!(
                "expected '大' or '小' to close a comparison, found {:?}",
                cursor.peek()
            )));
        };
        return Ok(Expr::Comparison {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        });
    }

    if cursor.eat_keyword("跟倒") {
        let rhs = parse_additive(cursor)?;
        let op = if cursor.eat_keyword("一模一样呢") {
            CompareOp::Eq
        } else if cursor.eat_keyword("不一样") {
            CompareOp::NotEq
        } else {
            return Err(parse_error(format!(
                "expected '一模一样呢' or '不一样' to close a comparison, found {:?}",
                cursor.peek()
            )));
        };
        return Ok(Expr::Comparison {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        });
    }

    Ok(lhs)
}

fn parse_additive(cursor: &mut Cursor) -> PResult<Expr> {
    let mut lhs = parse_multiplicative(cursor)?;

    loop {
        let op = if cursor.eat_keyword("加") {
            ArithOp::Add
        } else if cursor.eat_keyword("减") {
            ArithOp::Sub
        } else {
            break;
        };
        let rhs = parse_multiplicative(cursor)?;
        lhs = Expr::Arithmetic {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        };
    }

    Ok(lhs)
}

fn parse_multiplicative(cursor: &mut Cursor) -> PResult<Expr> {
    let mut lhs = parse_atom(cursor)?;

    loop {
        let op = if cursor.eat_keyword("乘") {
            ArithOp::Mul
        } else if cursor.eat_keyword("除以") {
            ArithOp::Div
        } else {
            break;
        };
        let rhs = parse_atom(cursor)?;
        lhs = Expr::Arithmetic {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        };
    }

    Ok(lhs)
}

fn parse_atom(cursor: &mut Cursor) -> PResult<Expr> {
    if cursor.eat_keyword("喊") {
        return parse_call_after_keyword(cursor);
    }

    if cursor.eat_keyword("（") || cursor.eat_keyword("(") {
        let inner = parse_expr(cursor)?;
        cursor
            .expect_keyword("）")
            .or_else(|_| cursor.expect_keyword(")"))?;
        return Ok(Expr::Paren(Box::new(inner)));
    }

    if cursor.eat_keyword("“") {
        let text = match cursor.next() {
            Some(Token::StringLiteral(text)) => text,
            other => {
                return Err(parse_error(format!(
                    "expected string literal contents, found {other:?}"
                )))
            }
        };
        cursor.expect_keyword("”")?;
        return Ok(Expr::Str(text));
    }

    match cursor.next() {
        Some(Token::IntLiteral(value)) => Ok(Expr::Int(value)),
        Some(Token::Identifier(name)) => Ok(Expr::Variable(name)),
        other => Err(parse_error(format!("expected an expression, found {other:?}"))),
    }
}
