//! Expansion of Slurm hostlist expressions, e.g. `q1-st-cr1-[1-3,07]` or
//! `q1-st-cr1-1,q1-dy-cr2-[1-2]`.

/// Expands a hostlist expression into single node names.
///
/// Malformed range items are kept verbatim so that membership comparisons fail
/// on the side of updating the reservation.
pub fn expand_hostlist(hostlist: &str) -> Vec<String> {
    let hostlist = hostlist.trim();
    if hostlist.is_empty() || hostlist == "(null)" {
        return Vec::new();
    }

    split_top_level(hostlist).into_iter().flat_map(|item| expand_item(&item)).collect()
}

/// Splits on commas that are not inside brackets.
fn split_top_level(hostlist: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in hostlist.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                if !current.is_empty() {
                    items.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        items.push(current);
    }

    items
}

fn expand_item(item: &str) -> Vec<String> {
    let (Some(open), Some(close)) = (item.find('['), item.find(']')) else {
        return vec![item.to_string()];
    };
    if close < open {
        return vec![item.to_string()];
    }

    let prefix = &item[..open];
    let ranges = &item[open + 1..close];
    let rest = &item[close + 1..];

    let Some(values) = expand_ranges(ranges) else {
        return vec![item.to_string()];
    };

    let suffixes = expand_item(rest);
    values.iter().flat_map(|value| suffixes.iter().map(move |suffix| format!("{}{}{}", prefix, value, suffix))).collect()
}

fn expand_ranges(ranges: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();

    for range in ranges.split(',') {
        match range.split_once('-') {
            Some((start, end)) => {
                let width = start.len();
                let start: u64 = start.parse().ok()?;
                let end: u64 = end.parse().ok()?;
                if end < start {
                    return None;
                }
                values.extend((start..=end).map(|value| format!("{:0width$}", value, width = width)));
            }
            None => {
                range.parse::<u64>().ok()?;
                values.push(range.to_string());
            }
        }
    }

    Some(values)
}
