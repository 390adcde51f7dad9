//! Value computation

use auris_dom::{collapse_whitespace, Document, NodeId};

use crate::role::{NodeKind, Role};

use super::PASSWORD_MASK;

/// Spoken value of a control, `None` when it has none
pub fn compute(doc: &Document, el: NodeId, role: Role, kind: NodeKind) -> Option<String> {
    if let Some(text) = doc.attr(el, "aria-valuetext").filter(|v| !v.trim().is_empty()) {
        return Some(collapse_whitespace(text));
    }

    if role.is_range() || doc.has_attr(el, "aria-valuenow") {
        return range_value(doc, el, role);
    }

    if kind != NodeKind::Interactive {
        return None;
    }

    let tag = doc.tag_name(el)?;
    let text = match tag {
        "input" => match doc.input_type(el).as_str() {
            "checkbox" | "radio" | "hidden" | "submit" | "reset" | "button" | "image" | "file" => return None,
            "password" => {
                return (!doc.value(el).is_empty()).then(|| PASSWORD_MASK.to_string());
            }
            _ => doc.value(el),
        },
        "textarea" => doc.value(el),
        "select" => {
            let texts: Vec<String> = doc.selected_options(el)
                .into_iter()
                .map(|opt| collapse_whitespace(&doc.text_content(opt)))
                .filter(|t| !t.is_empty())
                .collect();
            if role == Role::ListBox { texts.join(", ") } else { texts.into_iter().next().unwrap_or_default() }
        }
        // non-native text box: its plain content is the value
        _ if matches!(role, Role::TextBox | Role::SearchBox) && doc.element_children(el).is_empty() => {
            collapse_whitespace(&doc.text_content(el))
        }
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn number_attr(doc: &Document, el: NodeId, name: &str) -> Option<f64> {
    doc.attr(el, name)?.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// now/min/max, from ARIA first and native attributes second
fn range_value(doc: &Document, el: NodeId, role: Role) -> Option<String> {
    let tag = doc.tag_name(el).unwrap_or("");
    let aria_now = number_attr(doc, el, "aria-valuenow");
    let aria_min = number_attr(doc, el, "aria-valuemin");
    let aria_max = number_attr(doc, el, "aria-valuemax");

    let (now, min, max) = match tag {
        // a progress element without a value is indeterminate
        "progress" => {
            let now = aria_now.or_else(|| number_attr(doc, el, "value"))?;
            (now, aria_min.unwrap_or(0.0), aria_max.or_else(|| number_attr(doc, el, "max")).unwrap_or(1.0))
        }
        "meter" => {
            let now = aria_now.or_else(|| number_attr(doc, el, "value")).unwrap_or(0.0);
            let min = aria_min.or_else(|| number_attr(doc, el, "min")).unwrap_or(0.0);
            let max = aria_max.or_else(|| number_attr(doc, el, "max")).unwrap_or(1.0);
            (now, min, max)
        }
        "input" if doc.input_type(el) == "range" => {
            let min = aria_min.or_else(|| number_attr(doc, el, "min")).unwrap_or(0.0);
            let max = aria_max.or_else(|| number_attr(doc, el, "max")).unwrap_or(100.0);
            let now = aria_now
                .or_else(|| doc.value(el).trim().parse::<f64>().ok())
                .unwrap_or(min + (max - min) / 2.0);
            (now, min, max)
        }
        "input" if doc.input_type(el) == "number" => {
            let value = doc.value(el);
            let now = aria_now.or_else(|| value.trim().parse::<f64>().ok())?;
            (now, aria_min.unwrap_or(0.0), aria_max.unwrap_or(0.0))
        }
        _ => (aria_now?, aria_min.unwrap_or(0.0), aria_max.unwrap_or(100.0)),
    };

    if matches!(role, Role::ProgressBar | Role::Meter) && min < max {
        let percent = ((now - min) / (max - min) * 100.0).round();
        return Some(format!("{}%", format_number(percent)));
    }
    Some(format_number(now))
}

/// Format a number without a trailing ".0"
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let s = format!("{n:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
