//! Static composition tables for transitive chaining of temporal relations
//!
//! Each row `(r1, r2, allowed)` states that when `i r1 j` and `j r2 k` hold,
//! the closing relation on `(i, k)` must come from `allowed`. Label pairs not
//! listed here are unconstrained: any closing relation is admissible and no
//! constraint is generated for them. Rows use the scheme's short codes
//! (see the code lists in `scheme.rs`).

/// One composition row: (first relation, second relation, admissible closers).
pub(crate) type CompositionRow = (
    &'static str,
    &'static str,
    &'static [&'static str],
);

/// News-domain (TimeML) composition table.
///
/// Codes: p=BEFORE pi=AFTER o=INCLUDES oi=IS_INCLUDED d=DURING di=DURING_INV
/// Ii=SIMULTANEOUS mi=IAFTER m=IBEFORE I=IDENTITY s=BEGINS f=ENDS si=BEGUN_BY
/// fi=ENDED_BY n=NONE. Pairs involving n, and the contradictory pairs such as
/// (p, pi), are unconstrained and therefore absent.
pub(crate) const TIMEML: &[CompositionRow] = &[
    ("p", "p", &["p"]),
    ("p", "o", &["p"]),
    ("p", "oi", &["p", "d", "o", "m", "s"]),
    ("p", "d", &["p", "d", "o", "m", "s"]),
    ("p", "di", &["p"]),
    ("p", "Ii", &["p"]),
    ("p", "mi", &["p", "d", "o", "m", "s"]),
    ("p", "m", &["p"]),
    ("p", "I", &["p"]),
    ("p", "s", &["p"]),
    ("p", "f", &["p", "d", "o", "m", "s"]),
    ("p", "si", &["p"]),
    ("p", "fi", &["p"]),
    ("pi", "pi", &["pi"]),
    ("pi", "o", &["pi", "d", "oi", "mi", "f"]),
    ("pi", "oi", &["pi"]),
    ("pi", "d", &["pi", "d", "oi", "mi", "f"]),
    ("pi", "di", &["pi"]),
    ("pi", "Ii", &["pi"]),
    ("pi", "mi", &["pi"]),
    ("pi", "m", &["pi", "d", "oi", "mi", "f"]),
    ("pi", "I", &["pi"]),
    ("pi", "s", &["pi", "d", "oi", "mi", "f"]),
    ("pi", "f", &["pi"]),
    ("pi", "si", &["pi"]),
    ("pi", "fi", &["pi"]),
    ("o", "p", &["p"]),
    ("o", "pi", &["pi", "di", "oi", "mi", "si"]),
    ("o", "o", &["p", "o", "m"]),
    ("o", "d", &["d", "o", "s"]),
    ("o", "di", &["p", "di", "o", "m", "fi"]),
    ("o", "Ii", &["o"]),
    ("o", "mi", &["di", "oi", "si"]),
    ("o", "m", &["p"]),
    ("o", "I", &["o"]),
    ("o", "s", &["o"]),
    ("o", "f", &["d", "o", "s"]),
    ("o", "si", &["di", "o", "fi"]),
    ("o", "fi", &["p", "o", "m"]),
    ("oi", "p", &["p", "di", "o", "m", "fi"]),
    ("oi", "pi", &["pi"]),
    ("oi", "oi", &["pi", "oi", "mi"]),
    ("oi", "d", &["d", "oi", "f"]),
    ("oi", "di", &["pi", "di", "oi", "mi", "si"]),
    ("oi", "Ii", &["oi"]),
    ("oi", "mi", &["pi"]),
    ("oi", "m", &["di", "o", "fi"]),
    ("oi", "I", &["oi"]),
    ("oi", "s", &["di", "o", "fi"]),
    ("oi", "f", &["oi"]),
    ("oi", "si", &["pi", "oi", "mi"]),
    ("oi", "fi", &["di", "oi", "si"]),
    ("d", "p", &["p"]),
    ("d", "pi", &["pi"]),
    ("d", "o", &["p", "d", "o", "m", "s"]),
    ("d", "oi", &["pi", "d", "oi", "mi", "f"]),
    ("d", "d", &["d"]),
    ("d", "Ii", &["d"]),
    ("d", "mi", &["pi"]),
    ("d", "m", &["p"]),
    ("d", "I", &["d"]),
    ("d", "s", &["d"]),
    ("d", "f", &["d"]),
    ("d", "si", &["pi", "d", "oi", "mi", "f"]),
    ("d", "fi", &["p", "d", "o", "m", "s"]),
    ("di", "p", &["p", "di", "o", "m", "fi"]),
    ("di", "pi", &["pi", "di", "oi", "mi", "si"]),
    ("di", "o", &["di", "o", "fi"]),
    ("di", "oi", &["di", "oi", "si"]),
    ("di", "di", &["di"]),
    ("di", "Ii", &["di"]),
    ("di", "mi", &["di", "oi", "si"]),
    ("di", "m", &["di", "o", "fi"]),
    ("di", "I", &["di"]),
    ("di", "s", &["di", "o", "fi"]),
    ("di", "f", &["di", "oi", "si"]),
    ("di", "si", &["di"]),
    ("di", "fi", &["di"]),
    ("Ii", "p", &["p"]),
    ("Ii", "pi", &["pi"]),
    ("Ii", "o", &["o"]),
    ("Ii", "oi", &["oi"]),
    ("Ii", "d", &["d"]),
    ("Ii", "di", &["di"]),
    ("Ii", "Ii", &["Ii"]),
    ("Ii", "mi", &["mi"]),
    ("Ii", "m", &["m"]),
    ("Ii", "I", &["Ii"]),
    ("Ii", "s", &["s"]),
    ("Ii", "f", &["f"]),
    ("Ii", "si", &["si"]),
    ("Ii", "fi", &["fi"]),
    ("mi", "p", &["p", "di", "o", "m", "fi"]),
    ("mi", "pi", &["pi"]),
    ("mi", "o", &["d", "oi", "f"]),
    ("mi", "oi", &["pi"]),
    ("mi", "d", &["d", "oi", "f"]),
    ("mi", "di", &["pi"]),
    ("mi", "Ii", &["mi"]),
    ("mi", "mi", &["pi"]),
    ("mi", "m", &["I", "Ii", "s", "si"]),
    ("mi", "I", &["mi"]),
    ("mi", "s", &["d", "oi", "f"]),
    ("mi", "f", &["mi"]),
    ("mi", "si", &["pi"]),
    ("mi", "fi", &["mi"]),
    ("m", "p", &["p"]),
    ("m", "pi", &["pi", "di", "oi", "mi", "si"]),
    ("m", "o", &["p"]),
    ("m", "oi", &["d", "o", "s"]),
    ("m", "d", &["d", "o", "s"]),
    ("m", "di", &["p"]),
    ("m", "Ii", &["m"]),
    ("m", "mi", &["I", "Ii", "f", "fi"]),
    ("m", "m", &["p"]),
    ("m", "I", &["m"]),
    ("m", "s", &["m"]),
    ("m", "f", &["d", "o", "s"]),
    ("m", "si", &["m"]),
    ("m", "fi", &["p"]),
    ("I", "p", &["p"]),
    ("I", "pi", &["pi"]),
    ("I", "o", &["o"]),
    ("I", "oi", &["oi"]),
    ("I", "d", &["d"]),
    ("I", "di", &["di"]),
    ("I", "Ii", &["I"]),
    ("I", "mi", &["mi"]),
    ("I", "m", &["m"]),
    ("I", "I", &["I"]),
    ("I", "s", &["s"]),
    ("I", "f", &["f"]),
    ("I", "si", &["si"]),
    ("I", "fi", &["fi"]),
    ("s", "p", &["p"]),
    ("s", "pi", &["pi"]),
    ("s", "o", &["p", "o", "m"]),
    ("s", "oi", &["d", "oi", "f"]),
    ("s", "d", &["d"]),
    ("s", "di", &["p", "di", "o", "m", "fi"]),
    ("s", "Ii", &["s"]),
    ("s", "mi", &["mi"]),
    ("s", "m", &["p"]),
    ("s", "I", &["s"]),
    ("s", "s", &["s"]),
    ("s", "si", &["I", "Ii", "s", "si"]),
    ("s", "fi", &["p", "o", "m"]),
    ("f", "p", &["p"]),
    ("f", "pi", &["pi"]),
    ("f", "o", &["d", "o", "s"]),
    ("f", "oi", &["pi", "oi", "mi"]),
    ("f", "d", &["d"]),
    ("f", "di", &["pi", "di", "oi", "mi", "si"]),
    ("f", "Ii", &["f"]),
    ("f", "mi", &["pi"]),
    ("f", "m", &["m"]),
    ("f", "I", &["d"]),
    ("f", "f", &["d"]),
    ("f", "si", &["pi", "oi", "mi"]),
    ("f", "fi", &["I", "Ii", "f", "fi"]),
    ("si", "p", &["p", "di", "o", "m", "fi"]),
    ("si", "pi", &["pi"]),
    ("si", "o", &["di", "o", "fi"]),
    ("si", "oi", &["oi"]),
    ("si", "d", &["d", "oi", "f"]),
    ("si", "di", &["di"]),
    ("si", "Ii", &["si"]),
    ("si", "mi", &["mi"]),
    ("si", "m", &["di", "o", "fi"]),
    ("si", "I", &["si"]),
    ("si", "s", &["I", "Ii", "s", "si"]),
    ("si", "f", &["oi"]),
    ("si", "si", &["si"]),
    ("si", "fi", &["di"]),
    ("fi", "p", &["p"]),
    ("fi", "pi", &["pi", "di", "oi", "mi", "si"]),
    ("fi", "o", &["o"]),
    ("fi", "oi", &["di", "oi", "si"]),
    ("fi", "d", &["d", "o", "s"]),
    ("fi", "di", &["di"]),
    ("fi", "Ii", &["fi"]),
    ("fi", "mi", &["di", "oi", "si"]),
    ("fi", "m", &["m"]),
    ("fi", "I", &["fi"]),
    ("fi", "s", &["o"]),
    ("fi", "f", &["I", "Ii", "f", "fi"]),
    ("fi", "si", &["di"]),
    ("fi", "fi", &["fi"]),
];

/// Clinical (THYME) composition table.
///
/// Codes: p=BEFORE pi=AFTER c=CONTAINS ci=CONTAINS_INV o=OVERLAP b=BEGINS-ON
/// bi=ENDS-ON n=NONE.
pub(crate) const CLINICAL: &[CompositionRow] = &[
    ("p", "p", &["p"]),
    ("p", "c", &["p"]),
    ("p", "ci", &["p", "ci", "o", "bi"]),
    ("p", "o", &["p", "ci", "o", "bi"]),
    ("p", "b", &["p", "ci", "o", "bi"]),
    ("p", "bi", &["p"]),
    ("pi", "pi", &["pi"]),
    ("pi", "c", &["pi"]),
    ("pi", "ci", &["pi", "ci", "o", "b"]),
    ("pi", "o", &["pi", "ci", "o", "b"]),
    ("pi", "b", &["pi", "ci", "o", "b"]),
    ("pi", "bi", &["pi"]),
    ("c", "p", &["p", "c", "o", "bi"]),
    ("c", "pi", &["pi", "c", "o", "b"]),
    ("c", "c", &["c"]),
    ("c", "ci", &["c", "ci", "o"]),
    ("c", "o", &["c", "o"]),
    ("c", "b", &["c", "o"]),
    ("c", "bi", &["c", "o"]),
    ("ci", "p", &["p"]),
    ("ci", "pi", &["pi"]),
    ("ci", "ci", &["ci"]),
    ("ci", "o", &["p", "pi", "o", "b", "bi"]),
    ("ci", "b", &["pi"]),
    ("ci", "bi", &["p"]),
    ("o", "p", &["p", "c", "o", "bi"]),
    ("o", "pi", &["pi", "c", "o", "b"]),
    ("o", "c", &["c", "o"]),
    ("o", "ci", &["ci", "o"]),
    ("o", "o", &["ci", "o", "b", "bi"]),
    ("o", "b", &["pi", "c", "o"]),
    ("o", "bi", &["p", "c", "o"]),
    ("b", "p", &["p", "c", "o", "bi"]),
    ("b", "pi", &["pi"]),
    ("b", "c", &["pi"]),
    ("b", "ci", &["ci", "o"]),
    ("b", "o", &["pi", "ci", "o"]),
    ("b", "b", &["pi"]),
    ("b", "bi", &["c", "o"]),
    ("bi", "p", &["p"]),
    ("bi", "pi", &["pi", "c", "o", "b"]),
    ("bi", "c", &["p"]),
    ("bi", "ci", &["ci", "o"]),
    ("bi", "o", &["p", "ci", "o"]),
    ("bi", "b", &["c", "o"]),
    ("bi", "bi", &["p"]),
];
