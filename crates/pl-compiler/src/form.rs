use pl_core::{AfterLabel, Choice, Label, ParleyError, Sexpr};
use pl_reader::print_sexpr;

use crate::{
    FORM_AFTER, FORM_BODY, FORM_CHOICE, FORM_TEXT, GRAMMAR_KEYWORDS, KEYWORD_COND, KEYWORD_JUMP,
    SPECIAL_SET,
};

pub(crate) fn compile_label(items: &[Sexpr]) -> Result<Label, ParleyError> {
    let name = match items.get(1) {
        Some(Sexpr::Symbol(name)) => name.clone(),
        Some(other) => {
            return Err(ParleyError::malformed(format!(
                "Label name must be a symbol, got {} \"{}\".",
                other.kind_name(),
                print_sexpr(other)
            )))
        }
        None => return Err(ParleyError::malformed("(label) is missing its name.")),
    };

    let mut text: Option<String> = None;
    let mut choices: Option<Vec<Choice>> = None;
    let mut after: Option<AfterLabel> = None;

    for body_form in &items[2..] {
        let Some(form_items) = body_form.as_list() else {
            return Err(ParleyError::malformed(format!(
                "Label \"{}\" contains bare {} \"{}\"; expected (text ...), (choice ...) or (after ...).",
                name,
                body_form.kind_name(),
                print_sexpr(body_form)
            )));
        };

        match body_form.head_symbol() {
            Some(FORM_TEXT) => {
                if text.is_some() {
                    return Err(ParleyError::malformed(format!(
                        "Label \"{}\" declares (text ...) more than once.",
                        name
                    )));
                }
                text = Some(compile_text(&name, form_items)?);
            }
            Some(FORM_CHOICE) => {
                let choice = compile_choice(&name, form_items)?;
                choices.get_or_insert_with(Vec::new).push(choice);
            }
            Some(FORM_AFTER) => {
                if after.is_some() {
                    return Err(ParleyError::malformed(format!(
                        "Label \"{}\" declares (after ...) more than once.",
                        name
                    )));
                }
                after = Some(compile_after(&name, form_items)?);
            }
            _ => {
                return Err(ParleyError::malformed(format!(
                    "Unknown form \"{}\" in label \"{}\".",
                    print_sexpr(body_form),
                    name
                )))
            }
        }
    }

    let Some(text) = text else {
        return Err(ParleyError::malformed(format!(
            "Label \"{}\" has no (text \"...\") form.",
            name
        )));
    };

    Ok(Label {
        name,
        text,
        choices,
        after,
    })
}

pub(crate) fn compile_start(items: &[Sexpr]) -> Result<String, ParleyError> {
    match items {
        [_, Sexpr::Symbol(name)] => Ok(name.clone()),
        _ => Err(ParleyError::malformed(
            "start-dialogue takes exactly one label symbol: (start-dialogue <label>).",
        )),
    }
}

fn compile_text(label: &str, items: &[Sexpr]) -> Result<String, ParleyError> {
    match items {
        [_, Sexpr::Text(value)] => Ok(value.clone()),
        _ => Err(ParleyError::malformed(format!(
            "Label \"{}\": text takes exactly one string literal: (text \"...\").",
            label
        ))),
    }
}

/// Accepts both `(choice "t" target [cond])` and the keyword form
/// `(choice "t" [cond <expr>] jump target)`.
fn compile_choice(label: &str, items: &[Sexpr]) -> Result<Choice, ParleyError> {
    let text = match items.get(1) {
        Some(Sexpr::Text(value)) => value.clone(),
        _ => {
            return Err(ParleyError::malformed(format!(
                "Label \"{}\": choice must start with its display string.",
                label
            )))
        }
    };
    let rest = &items[2..];

    let keyword_form = rest.len() >= 2
        && matches!(rest[0].as_symbol(), Some(KEYWORD_JUMP) | Some(KEYWORD_COND));

    let (target_label, condition) = if keyword_form {
        compile_choice_keywords(label, &text, rest)?
    } else {
        match rest {
            [Sexpr::Symbol(target)] => (target.clone(), None),
            [Sexpr::Symbol(target), condition] => (target.clone(), Some(condition.clone())),
            _ => {
                return Err(ParleyError::malformed(format!(
                    "Label \"{}\": choice \"{}\" must be (choice \"text\" <label> [<condition>]) or use jump/cond keywords.",
                    label, text
                )))
            }
        }
    };

    if let Some(condition) = &condition {
        check_code(label, condition)?;
    }

    Ok(Choice {
        text,
        target_label,
        condition,
    })
}

fn compile_choice_keywords(
    label: &str,
    text: &str,
    rest: &[Sexpr],
) -> Result<(String, Option<Sexpr>), ParleyError> {
    let mut target: Option<String> = None;
    let mut condition: Option<Sexpr> = None;

    for pair in rest.chunks(2) {
        let [key, value] = pair else {
            return Err(ParleyError::malformed(format!(
                "Label \"{}\": choice \"{}\" has a keyword without a value.",
                label, text
            )));
        };
        match key.as_symbol() {
            Some(KEYWORD_JUMP) if target.is_none() => {
                let Some(name) = value.as_symbol() else {
                    return Err(ParleyError::malformed(format!(
                        "Label \"{}\": choice \"{}\" must jump to a label symbol.",
                        label, text
                    )));
                };
                target = Some(name.to_string());
            }
            Some(KEYWORD_COND) if condition.is_none() => condition = Some(value.clone()),
            _ => {
                return Err(ParleyError::malformed(format!(
                    "Label \"{}\": choice \"{}\" has unexpected or repeated \"{}\".",
                    label,
                    text,
                    print_sexpr(key)
                )))
            }
        }
    }

    let Some(target) = target else {
        return Err(ParleyError::malformed(format!(
            "Label \"{}\": choice \"{}\" has no jump target.",
            label, text
        )));
    };
    Ok((target, condition))
}

fn compile_after(label: &str, items: &[Sexpr]) -> Result<AfterLabel, ParleyError> {
    let mut code_blocks: Option<Vec<Sexpr>> = None;
    let mut target_label: Option<String> = None;
    let mut rest = items[1..].iter();

    while let Some(item) = rest.next() {
        if item.head_symbol() == Some(FORM_BODY) && code_blocks.is_none() {
            let body = item.as_list().unwrap_or_default();
            for code in &body[1..] {
                check_code(label, code)?;
            }
            code_blocks = Some(body[1..].to_vec());
            continue;
        }
        if item.as_symbol() == Some(KEYWORD_JUMP) && target_label.is_none() {
            let Some(target) = rest.next().and_then(Sexpr::as_symbol) else {
                return Err(ParleyError::malformed(format!(
                    "Label \"{}\": after's jump must name a label symbol.",
                    label
                )));
            };
            target_label = Some(target.to_string());
            continue;
        }
        return Err(ParleyError::malformed(format!(
            "Label \"{}\": unexpected \"{}\" in after; expected (body ...) and jump <label>.",
            label,
            print_sexpr(item)
        )));
    }

    Ok(AfterLabel {
        code_blocks: code_blocks.unwrap_or_default(),
        target_label,
    })
}

/// Shape checks for expressions stored in conditions and bodies.
fn check_code(label: &str, expr: &Sexpr) -> Result<(), ParleyError> {
    let Some(items) = expr.as_list() else {
        return Ok(());
    };

    if let Some(head) = expr.head_symbol() {
        if GRAMMAR_KEYWORDS.contains(&head) {
            return Err(ParleyError::malformed(format!(
                "Label \"{}\": \"{}\" is dialogue grammar and cannot appear inside code: {}",
                label,
                head,
                print_sexpr(expr)
            )));
        }
        if head == SPECIAL_SET && !matches!(items, [_, Sexpr::Symbol(_), _]) {
            return Err(ParleyError::malformed(format!(
                "Label \"{}\": set* must be (set* <symbol> <expr>), got {}",
                label,
                print_sexpr(expr)
            )));
        }
    }

    items.iter().try_for_each(|item| check_code(label, item))
}
