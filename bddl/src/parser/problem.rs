use crate::ast::{GoalExpr, ObjectDecl, PredicateCall, Problem, RegionDef, Term};
use crate::error_reporting::SourceSpan;
use crate::parser::errors::{invalid_input_error, ParseError};
use crate::parser::sexpr::SExpr;
use std::collections::HashSet;
use tracing::warn;

// --- Problem lowering ---

pub fn build_problem(form: &SExpr) -> Result<Problem, ParseError> {
    let items = expect_list(form, "(define ...)")?;
    let head = items
        .first()
        .and_then(SExpr::as_symbol)
        .ok_or_else(|| invalid_input_error("expected (define ...)", form.span()))?;
    if !head.eq_ignore_ascii_case("define") {
        return Err(invalid_input_error(
            format!("expected 'define', found '{}'", head),
            form.span(),
        ));
    }

    let name = items
        .get(1)
        .ok_or_else(|| invalid_input_error("missing (problem NAME)", form.span()))
        .and_then(build_problem_name)?;

    let mut domain = None;
    let mut language = None;
    let mut regions = Vec::new();
    let mut fixtures = Vec::new();
    let mut objects = Vec::new();
    let mut objects_of_interest = Vec::new();
    let mut init = Vec::new();
    let mut goal = None;
    let mut seen: HashSet<String> = HashSet::new();

    for section in &items[2..] {
        let parts = expect_list(section, "a (:section ...) form")?;
        let keyword = parts
            .first()
            .and_then(SExpr::as_keyword)
            .ok_or_else(|| invalid_input_error("section must start with a keyword", section.span()))?
            .to_lowercase();
        if !seen.insert(keyword.clone()) {
            return Err(ParseError::DuplicateSection {
                section: keyword,
                span: section.span(),
            });
        }
        let body = &parts[1..];

        match keyword.as_str() {
            "domain" => {
                domain = Some(expect_symbol(single(body, "domain", section.span())?, "domain name")?)
            }
            "language" => language = Some(build_language(body, section.span())?),
            "regions" => {
                regions = body
                    .iter()
                    .map(build_region)
                    .collect::<Result<Vec<_>, _>>()?
            }
            "fixtures" => fixtures = build_declarations(body, section.span())?,
            "objects" => objects = build_declarations(body, section.span())?,
            "obj_of_interest" => {
                objects_of_interest = body
                    .iter()
                    .map(|item| expect_symbol(item, "object name"))
                    .collect::<Result<Vec<_>, _>>()?
            }
            "init" => {
                init = body
                    .iter()
                    .map(build_predicate_call)
                    .collect::<Result<Vec<_>, _>>()?
            }
            "goal" => goal = Some(build_top_goal(single(body, "goal", section.span())?)?),
            other => {
                warn!(section = other, line = section.span().start_line, "skipping unknown BDDL section");
            }
        }
    }

    Ok(Problem {
        name,
        domain: domain.unwrap_or_else(|| "robosuite".to_string()),
        language: language.ok_or_else(|| ParseError::MissingSection("language".to_string()))?,
        regions,
        fixtures,
        objects,
        objects_of_interest,
        init,
        goal: goal.ok_or_else(|| ParseError::MissingSection("goal".to_string()))?,
    })
}

fn build_problem_name(form: &SExpr) -> Result<String, ParseError> {
    let parts = expect_list(form, "(problem NAME)")?;
    match parts {
        [SExpr::Symbol(tag, _), name] if tag.eq_ignore_ascii_case("problem") => {
            expect_symbol(name, "problem name")
        }
        _ => Err(invalid_input_error("expected (problem NAME)", form.span())),
    }
}

fn build_language(body: &[SExpr], span: SourceSpan) -> Result<String, ParseError> {
    let words = body
        .iter()
        .map(|item| {
            item.atom_text()
                .ok_or_else(|| invalid_input_error("language must be plain words", item.span()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if words.is_empty() {
        return Err(invalid_input_error("language description is empty", span));
    }
    Ok(words.join(" "))
}

/// `a b - category c - other` style declarations.
fn build_declarations(body: &[SExpr], span: SourceSpan) -> Result<Vec<ObjectDecl>, ParseError> {
    let mut decls = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut iter = body.iter();
    while let Some(item) = iter.next() {
        let token = expect_symbol(item, "declaration")?;
        if token == "-" {
            let category = iter
                .next()
                .ok_or_else(|| invalid_input_error("'-' must be followed by a category", item.span()))
                .and_then(|c| expect_symbol(c, "category"))?;
            if pending.is_empty() {
                return Err(invalid_input_error(
                    format!("category '{}' has no names before it", category),
                    item.span(),
                ));
            }
            decls.extend(pending.drain(..).map(|name| ObjectDecl { name, category: category.clone() }));
        } else {
            pending.push(token);
        }
    }
    if !pending.is_empty() {
        return Err(invalid_input_error(
            format!("missing category for: {}", pending.join(", ")),
            span,
        ));
    }
    Ok(decls)
}

fn build_region(form: &SExpr) -> Result<RegionDef, ParseError> {
    let parts = expect_list(form, "(region_name (:target ...) ...)")?;
    let name = parts
        .first()
        .ok_or_else(|| invalid_input_error("empty region", form.span()))
        .and_then(|n| expect_symbol(n, "region name"))?;

    let mut target = None;
    let mut ranges = Vec::new();
    let mut yaw_rotation = Vec::new();
    let mut rgba = None;

    for attr in &parts[1..] {
        let attr_parts = expect_list(attr, "a region attribute")?;
        let key = attr_parts
            .first()
            .and_then(SExpr::as_keyword)
            .ok_or_else(|| invalid_input_error("region attribute must start with a keyword", attr.span()))?
            .to_lowercase();
        let body = &attr_parts[1..];
        match key.as_str() {
            "target" => target = Some(expect_symbol(single(body, "target", attr.span())?, "region target")?),
            "ranges" => {
                ranges = number_rows(single(body, "ranges", attr.span())?)?
                    .into_iter()
                    .map(|row| fixed::<4>(&row, attr.span()))
                    .collect::<Result<Vec<_>, _>>()?
            }
            "yaw_rotation" => {
                yaw_rotation = number_rows(single(body, "yaw_rotation", attr.span())?)?
                    .into_iter()
                    .map(|row| fixed::<2>(&row, attr.span()))
                    .collect::<Result<Vec<_>, _>>()?
            }
            "rgba" => {
                let values = numbers(single(body, "rgba", attr.span())?)?;
                rgba = Some(fixed::<4>(&values, attr.span())?);
            }
            other => warn!(region = %name, attribute = other, "skipping unknown region attribute"),
        }
    }

    Ok(RegionDef {
        target: target
            .ok_or_else(|| invalid_input_error(format!("region '{}' has no :target", name), form.span()))?,
        name,
        ranges,
        yaw_rotation,
        rgba,
    })
}

// --- Goals and predicate calls ---

/// The `:goal` body. A bare atom is wrapped so the top level is always a conjunction.
pub fn build_top_goal(form: &SExpr) -> Result<GoalExpr, ParseError> {
    match build_goal(form)? {
        goal @ GoalExpr::And(_) => Ok(goal),
        other => Ok(GoalExpr::And(vec![other])),
    }
}

pub fn build_goal(form: &SExpr) -> Result<GoalExpr, ParseError> {
    let parts = expect_list(form, "a goal formula")?;
    let head = parts
        .first()
        .and_then(SExpr::as_symbol)
        .ok_or_else(|| invalid_input_error("goal formula must start with a name", form.span()))?;

    match head.to_lowercase().as_str() {
        // `all`/`any` are the n-ary spellings of `and`/`or`
        "and" | "all" => Ok(GoalExpr::And(
            parts[1..].iter().map(build_goal).collect::<Result<Vec<_>, _>>()?,
        )),
        "or" | "any" => Ok(GoalExpr::Or(
            parts[1..].iter().map(build_goal).collect::<Result<Vec<_>, _>>()?,
        )),
        "not" => match &parts[1..] {
            [inner] => Ok(GoalExpr::Not(Box::new(build_goal(inner)?))),
            rest => Err(invalid_input_error(
                format!("Not takes exactly one formula, found {}", rest.len()),
                form.span(),
            )),
        },
        _ => Ok(GoalExpr::Atom(build_predicate_call(form)?)),
    }
}

pub fn build_predicate_call(form: &SExpr) -> Result<PredicateCall, ParseError> {
    let parts = expect_list(form, "a predicate invocation")?;
    let name = parts
        .first()
        .and_then(SExpr::as_symbol)
        .ok_or_else(|| invalid_input_error("predicate invocation must start with a name", form.span()))?;
    let args = parts[1..]
        .iter()
        .map(|arg| match arg {
            SExpr::Symbol(s, _) => Ok(Term::Symbol(s.clone())),
            SExpr::Number(n, _, _) => Ok(Term::Number(*n)),
            other => Err(invalid_input_error(
                format!("predicate '{}' cannot take a {} argument", name, other.describe()),
                other.span(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PredicateCall {
        name: name.to_string(),
        args,
    })
}

// --- Small helpers ---

fn expect_list<'a>(form: &'a SExpr, what: &str) -> Result<&'a [SExpr], ParseError> {
    form.as_list().ok_or_else(|| {
        invalid_input_error(
            format!("expected {}, found {}", what, form.describe()),
            form.span(),
        )
    })
}

fn expect_symbol(form: &SExpr, what: &str) -> Result<String, ParseError> {
    form.as_symbol().map(str::to_string).ok_or_else(|| {
        invalid_input_error(
            format!("expected {} symbol, found {}", what, form.describe()),
            form.span(),
        )
    })
}

fn single<'a>(body: &'a [SExpr], section: &str, span: SourceSpan) -> Result<&'a SExpr, ParseError> {
    match body {
        [only] => Ok(only),
        _ => Err(invalid_input_error(
            format!(":{} expects exactly one value, found {}", section, body.len()),
            span,
        )),
    }
}

fn numbers(form: &SExpr) -> Result<Vec<f64>, ParseError> {
    expect_list(form, "a list of numbers")?
        .iter()
        .map(|item| {
            item.as_number()
                .ok_or_else(|| invalid_input_error("expected a number", item.span()))
        })
        .collect()
}

fn number_rows(form: &SExpr) -> Result<Vec<Vec<f64>>, ParseError> {
    expect_list(form, "a list of number rows")?
        .iter()
        .map(numbers)
        .collect()
}

fn fixed<const N: usize>(values: &[f64], span: SourceSpan) -> Result<[f64; N], ParseError> {
    <[f64; N]>::try_from(values).map_err(|_| {
        invalid_input_error(
            format!("expected {} numbers, found {}", N, values.len()),
            span,
        )
    })
}
