//! Binary integer program for globally consistent label selection

use std::collections::BTreeMap;

use good_lp::{
    constraint, default_solver, variable, variables, Expression, ResolutionError, Solution,
    SolverModel,
};

use crate::ensemble::{Arc, WeightVector};
use crate::error::EnsembleError;
use crate::optimizer::triples::connected_triples;
use crate::optimizer::{Consensus, SolveStatus};
use crate::relation::RelationScheme;

/// Build and solve the consistency program.
///
/// One binary variable per (arc, label); the objective maximizes the total
/// selected evidence. Exactly-one constraints keep one label per arc;
/// transitivity constraints forbid choosing `r1` on `(i,j)` and `r2` on
/// `(j,k)` together with any closing label outside `compose(r1, r2)`.
pub(crate) fn solve(
    weights: &BTreeMap<Arc, WeightVector>,
    scheme: &RelationScheme,
) -> Result<Consensus, EnsembleError> {
    let arcs: Vec<&Arc> = weights.keys().collect();
    let arc_index: BTreeMap<&Arc, usize> = arcs
        .iter()
        .enumerate()
        .map(|(i, arc)| (*arc, i))
        .collect();
    let labels = scheme.len();

    let mut vars = variables!();
    let mut x = Vec::with_capacity(arcs.len() * labels);
    for _ in 0..arcs.len() * labels {
        x.push(vars.add(variable().binary()));
    }
    let var = |arc: usize, rel: usize| x[arc * labels + rel];

    let objective: Expression = arcs
        .iter()
        .enumerate()
        .flat_map(|(a, arc)| {
            let vector = &weights[*arc];
            scheme.iter().map(move |r| vector.get(r) * var(a, r.0))
        })
        .sum();

    let mut model = vars.maximise(objective).using(default_solver);
    let mut constraints = 0usize;

    for a in 0..arcs.len() {
        let one_label: Expression = scheme
            .iter()
            .map(|r| Expression::from(var(a, r.0)))
            .sum();
        model = model.with(constraint!(one_label == 1));
        constraints += 1;
    }

    let triples = connected_triples(&arcs);
    tracing::debug!(
        arcs = arcs.len(),
        triples = triples.len(),
        "building transitivity constraints"
    );
    for triple in &triples {
        let ij = arc_index[&triple.arc_first_middle()];
        let jk = arc_index[&triple.arc_middle_last()];
        let ik = arc_index[&triple.arc_first_last()];
        for r1 in scheme.iter() {
            for r2 in scheme.iter() {
                let Some(allowed) = scheme.compose(r1, r2) else {
                    continue;
                };
                let closing: Expression = allowed
                    .iter()
                    .map(|r3| Expression::from(var(ik, r3.0)))
                    .sum();
                let lhs = Expression::from(var(ij, r1.0)) + var(jk, r2.0) - closing;
                model = model.with(constraint!(lhs <= 1));
                constraints += 1;
            }
        }
    }

    let solution = model.solve().map_err(|err| match err {
        ResolutionError::Infeasible => EnsembleError::SolverInfeasible { arcs: arcs.len() },
        other => EnsembleError::Solver(other.to_string()),
    })?;

    let mut labels_out = BTreeMap::new();
    for (a, arc) in arcs.iter().enumerate() {
        let chosen = scheme
            .iter()
            .find(|r| solution.value(var(a, r.0)) > 0.5)
            .ok_or_else(|| EnsembleError::Solver(format!("no label selected for arc {arc}")))?;
        labels_out.insert((*arc).clone(), chosen);
    }

    Ok(Consensus {
        labels: labels_out,
        // The bundled solver either proves optimality or errors out; a
        // time-limited backend would report Suboptimal here instead.
        status: SolveStatus::Optimal,
        variables: arcs.len() * labels,
        constraints,
    })
}
