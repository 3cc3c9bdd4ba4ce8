use std::io::BufRead;

use anyhow::{Context, Result, bail};

use crate::names::NameMap;
use crate::network::{Network, ResetValue};
use crate::reader::{AigerEvents, AigerReader, DecodeSummary, Header};

/// Decodes ASCII AIGER text into `ntk`.
pub fn decode_aag_str<N: Network>(
    s: &str,
    ntk: &mut N,
    names: Option<&mut NameMap<N::Signal>>,
) -> Result<DecodeSummary> {
    decode_aag_reader(std::io::Cursor::new(s.as_bytes()), ntk, names)
}

pub fn decode_aag_reader<R: BufRead, N: Network>(
    r: R,
    ntk: &mut N,
    names: Option<&mut NameMap<N::Signal>>,
) -> Result<DecodeSummary> {
    let mut reader = match names {
        Some(names) => AigerReader::with_names(ntk, names),
        None => AigerReader::new(ntk),
    };
    read_aag(r, &mut reader)?;
    let summary = reader.finalize().context("failed to build network")?;
    Ok(summary)
}

/// Lexes ASCII AIGER and pushes one event per definition and symbol.
///
/// Inputs and latches must carry canonical literals, since node indices are
/// assigned in arrival order. Everything after a `c` line is ignored.
pub fn read_aag<R: BufRead, E: AigerEvents>(r: R, events: &mut E) -> Result<Header> {
    let lines = r
        .lines()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read aag input")?;

    if lines.is_empty() {
        bail!("empty input");
    }

    let header = parse_header(lines[0].trim())?;
    let needed =
        1 + header.num_inputs + header.num_latches + header.num_outputs + header.num_ands;
    if lines.len() < needed {
        bail!(
            "truncated aag: expected at least {} lines, found {}",
            needed,
            lines.len()
        );
    }
    events.on_header(header);

    let mut cursor = 1usize;
    for i in 0..header.num_inputs {
        let line_no = cursor + 1;
        let parts = fields(&lines[cursor], line_no, "input", 1, 1)?;
        cursor += 1;
        let lit = parse_u32_token(parts[0], "input")?;
        let expected = 2 * (1 + i as u32);
        if lit != expected {
            bail!(
                "input {} on line {} has literal {}, expected {}",
                i,
                line_no,
                lit,
                expected
            );
        }
    }

    for k in 0..header.num_latches {
        let line_no = cursor + 1;
        let parts = fields(&lines[cursor], line_no, "latch", 2, 3)?;
        cursor += 1;
        let lit = parse_u32_token(parts[0], "latch")?;
        let expected = 2 * (1 + header.num_inputs + k) as u32;
        if lit != expected {
            bail!(
                "latch {} on line {} has literal {}, expected {}",
                k,
                line_no,
                lit,
                expected
            );
        }
        let next = parse_u32_token(parts[1], "latch next")?;
        let reset = match parts.get(2) {
            None => ResetValue::Zero,
            Some(&"0") => ResetValue::Zero,
            Some(&"1") => ResetValue::One,
            Some(tok) if parse_u32_token(tok, "latch reset")? == lit => {
                ResetValue::Nondeterministic
            }
            Some(tok) => bail!(
                "invalid latch reset '{}' on line {}: expected 0, 1 or {}",
                tok,
                line_no,
                lit
            ),
        };
        events.on_latch(k, next, reset);
    }

    for o in 0..header.num_outputs {
        let line_no = cursor + 1;
        let parts = fields(&lines[cursor], line_no, "output", 1, 1)?;
        cursor += 1;
        let lit = parse_u32_token(parts[0], "output")?;
        events.on_output(o, lit);
    }

    for _ in 0..header.num_ands {
        let line_no = cursor + 1;
        let parts = fields(&lines[cursor], line_no, "and", 3, 3)?;
        cursor += 1;

        let lhs = parse_u32_token(parts[0], "and lhs")?;
        let rhs0 = parse_u32_token(parts[1], "and rhs0")?;
        let rhs1 = parse_u32_token(parts[2], "and rhs1")?;

        if lhs == 0 || lhs % 2 == 1 {
            bail!("invalid and lhs on line {}: must be even and nonzero", line_no);
        }
        events.on_and(lhs / 2, rhs0, rhs1);
    }

    for (idx, line) in lines.iter().enumerate().skip(cursor) {
        let line_no = idx + 1;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line == "c" || line.starts_with("c ") {
            break;
        }
        parse_symbol(line, line_no, &header, events)?;
    }

    Ok(header)
}

fn parse_header(line: &str) -> Result<Header> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() < 6 || parts[0] != "aag" {
        bail!("invalid header, expected: aag M I L O A");
    }
    if parts.len() > 10 {
        bail!("invalid header, too many fields");
    }
    // B C J F sections have no events
    for (tok, what) in parts[6..].iter().zip(["B", "C", "J", "F"]) {
        if parse_u32_token(tok, what)? != 0 {
            bail!("{} sections are not supported ({}={})", what, what, tok);
        }
    }

    let header = Header {
        max_var: parse_u32_token(parts[1], "M")?,
        num_inputs: parse_u32_token(parts[2], "I")? as usize,
        num_latches: parse_u32_token(parts[3], "L")? as usize,
        num_outputs: parse_u32_token(parts[4], "O")? as usize,
        num_ands: parse_u32_token(parts[5], "A")? as usize,
    };
    let declared = header.num_inputs + header.num_latches + header.num_ands;
    if declared > header.max_var as usize {
        bail!(
            "header M={} is smaller than I+L+A={}",
            header.max_var,
            declared
        );
    }
    Ok(header)
}

fn parse_symbol<E: AigerEvents>(
    line: &str,
    line_no: usize,
    header: &Header,
    events: &mut E,
) -> Result<()> {
    let Some((tag, name)) = line.split_once(' ') else {
        bail!("invalid symbol line {}: expected '<kind><index> <name>'", line_no);
    };
    let (Some(kind), Some(index)) = (tag.get(..1), tag.get(1..)) else {
        bail!("invalid symbol line {}: expected '<kind><index> <name>'", line_no);
    };
    let index = index
        .parse::<usize>()
        .with_context(|| format!("invalid symbol index on line {}: {}", line_no, tag))?;

    let (limit, what) = match kind {
        "i" => (header.num_inputs, "input"),
        "l" => (header.num_latches, "latch"),
        "o" => (header.num_outputs, "output"),
        // bad/constraint/justice/fairness symbols are not decoded
        "b" | "c" | "j" | "f" => return Ok(()),
        _ => bail!("unknown symbol kind '{}' on line {}", kind, line_no),
    };
    if index >= limit {
        bail!(
            "{} symbol {} on line {} out of range ({} declared)",
            what,
            index,
            line_no,
            limit
        );
    }

    match kind {
        "i" => events.on_input_name(index, name),
        "l" => events.on_latch_name(index, name),
        _ => events.on_output_name(index, name),
    }
    Ok(())
}

fn fields<'l>(
    line: &'l str,
    line_no: usize,
    kind: &str,
    min: usize,
    max: usize,
) -> Result<Vec<&'l str>> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() < min || parts.len() > max {
        bail!(
            "invalid {} line {}: got {} fields",
            kind,
            line_no,
            parts.len()
        );
    }
    Ok(parts)
}

fn parse_u32_token(token: &str, what: &str) -> Result<u32> {
    token
        .parse::<u32>()
        .with_context(|| format!("invalid {} value: {}", what, token))
}
