//! Handshake pattern table: pre-messages and per-message token sequences
//! for every fundamental Noise pattern, plus PSK modifiers.
//!
//! The token-sequence table is grounded on the `HandshakePattern::to_tokens`
//! match in `al-net::noise::handshake_pattern`, extended from its
//! nine patterns to the full set of fundamental one-way (`N`, `K`, `X`) and
//! interactive (`NN`, `NK`, `NX`, `KN`, `KK`, `KX`, `XN`, `XK`, `XX`, `IN`,
//! `IK`, `IX`) patterns, and extended
//! again with the `psk<N>` modifier grammar.

use crate::NoiseError;

/// A single mixing operation within a message pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    E,
    S,
    Ee,
    Es,
    Se,
    Ss,
    Psk,
}

/// Which side is required to reveal a key before the first handshake
/// message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreToken {
    E,
    S,
}

/// An immutable handshake pattern description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: String,
    pub premessages_initiator: Vec<PreToken>,
    pub premessages_responder: Vec<PreToken>,
    pub messages: Vec<Vec<Token>>,
}

impl Pattern {
    /// `true` for patterns whose name carries a `psk` modifier.
    pub fn requires_psk(&self) -> bool {
        self.messages.iter().any(|m| m.contains(&Token::Psk))
    }

    /// `true` for the single-message one-way patterns `N`, `K`, `X`.
    pub fn is_one_way(&self) -> bool {
        self.messages.len() == 1
    }

    /// Look up a pattern by its canonical name fragment, e.g. `"XX"`,
    /// `"IKpsk2"`, `"Npsk0"`.
    pub fn lookup(spec: &str) -> crate::Result<Pattern> {
        let (base, psk_indices) = split_psk_modifiers(spec)?;
        let mut messages = base_tokens(base)?;
        let (pre_i, pre_r) = base_premessages(base)?;
        for idx in psk_indices {
            apply_psk_modifier(&mut messages, idx)?;
        }
        Ok(Pattern {
            name: spec.to_string(),
            premessages_initiator: pre_i,
            premessages_responder: pre_r,
            messages,
        })
    }
}

/// Split `"XXpsk3"` into `("XX", [3])`; `"XX"` into `("XX", [])`.
fn split_psk_modifiers(spec: &str) -> crate::Result<(&str, Vec<usize>)> {
    match spec.find("psk") {
        None => Ok((spec, Vec::new())),
        Some(pos) => {
            let base = &spec[..pos];
            let digits = &spec[pos + 3..];
            let idx: usize = digits
                .parse()
                .map_err(|_| NoiseError::UnknownName(spec.to_string()))?;
            Ok((base, vec![idx]))
        }
    }
}

/// `psk0` prepends a PSK token to message 0; `psk<N>` (N >= 1) appends one
/// to the end of message `N - 1`.
fn apply_psk_modifier(messages: &mut [Vec<Token>], idx: usize) -> crate::Result<()> {
    if idx == 0 {
        messages
            .first_mut()
            .ok_or_else(|| NoiseError::UnknownName("psk0 on pattern with no messages".into()))?
            .insert(0, Token::Psk);
    } else {
        let m = messages
            .get_mut(idx - 1)
            .ok_or_else(|| NoiseError::UnknownName(format!("psk{idx} out of range")))?;
        m.push(Token::Psk);
    }
    Ok(())
}

fn base_premessages(base: &str) -> crate::Result<(Vec<PreToken>, Vec<PreToken>)> {
    use PreToken::*;
    let r = match base {
        "NN" | "NX" | "XN" | "XX" | "IN" | "IX" => (vec![], vec![]),
        "N" | "NK" | "XK" | "IK" => (vec![], vec![S]),
        "KN" | "KX" => (vec![S], vec![]),
        "K" | "KK" => (vec![S], vec![S]),
        "X" => (vec![], vec![S]),
        other => return Err(NoiseError::UnknownName(other.to_string())),
    };
    Ok(r)
}

fn base_tokens(base: &str) -> crate::Result<Vec<Vec<Token>>> {
    use Token::*;
    let p = match base {
        // One-way patterns.
        "N" => vec![vec![E, Es]],
        "K" => vec![vec![E, Es, Ss]],
        "X" => vec![vec![E, Es, S, Ss]],
        // Interactive patterns.
        "NN" => vec![vec![E], vec![E, Ee]],
        "NK" => vec![vec![E, Es], vec![E, Ee]],
        "NX" => vec![vec![E], vec![E, Ee, S, Es]],
        "KN" => vec![vec![E], vec![E, Ee, Se]],
        "KK" => vec![vec![E, Es, Ss], vec![E, Ee, Se]],
        "KX" => vec![vec![E], vec![E, Ee, Se, S, Es]],
        "XN" => vec![vec![E], vec![E, Ee], vec![S, Se]],
        "XK" => vec![vec![E, Es], vec![E, Ee], vec![S, Se]],
        "XX" => vec![vec![E], vec![E, Ee, S, Es], vec![S, Se]],
        "IN" => vec![vec![E, S], vec![E, Ee, Se]],
        "IK" => vec![vec![E, Es, S, Ss], vec![E, Ee, Se]],
        "IX" => vec![vec![E, S], vec![E, Ee, Se, S, Es]],
        other => return Err(NoiseError::UnknownName(other.to_string())),
    };
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nn_has_two_messages_no_premessage() {
        let p = Pattern::lookup("NN").unwrap();
        assert_eq!(p.messages.len(), 2);
        assert!(p.premessages_initiator.is_empty());
        assert!(p.premessages_responder.is_empty());
        assert!(!p.requires_psk());
        assert!(!p.is_one_way());
    }

    #[test]
    fn one_way_patterns_have_one_message() {
        for name in ["N", "K", "X"] {
            let p = Pattern::lookup(name).unwrap();
            assert!(p.is_one_way(), "{name}");
        }
    }

    #[test]
    fn xk_requires_responder_premessage() {
        let p = Pattern::lookup("XK").unwrap();
        assert_eq!(p.premessages_responder, vec![PreToken::S]);
        assert!(p.premessages_initiator.is_empty());
    }

    #[test]
    fn n_requires_responder_premessage() {
        let p = Pattern::lookup("N").unwrap();
        assert_eq!(p.premessages_responder, vec![PreToken::S]);
        assert!(p.premessages_initiator.is_empty());
    }

    #[test]
    fn kn_and_kx_require_initiator_premessage() {
        for name in ["KN", "KX"] {
            let p = Pattern::lookup(name).unwrap();
            assert_eq!(p.premessages_initiator, vec![PreToken::S], "{name}");
            assert!(p.premessages_responder.is_empty(), "{name}");
        }
    }

    #[test]
    fn ikpsk2_inserts_psk_at_end_of_second_message() {
        let p = Pattern::lookup("IKpsk2").unwrap();
        assert!(p.requires_psk());
        assert_eq!(*p.messages[1].last().unwrap(), Token::Psk);
    }

    #[test]
    fn psk0_prepends_first_message() {
        let p = Pattern::lookup("NNpsk0").unwrap();
        assert_eq!(p.messages[0][0], Token::Psk);
    }

    #[test]
    fn unknown_pattern_fails() {
        assert!(Pattern::lookup("ZZ").is_err());
    }
}
