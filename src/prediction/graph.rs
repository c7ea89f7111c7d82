//! Graph-output predictions: the DGP graph condition doubles as the
//! predictor, with nodes `1..=num_y_vars` designated as output nodes.
//! There is nothing to fit; the graph itself evolves through the GA.

use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::condition::ConditionKind;
use crate::prediction::{NumericFault, Prediction};

#[derive(Debug, Clone, PartialEq)]
pub struct GraphPredictor {
    pre: Array1<f64>,
}

impl GraphPredictor {
    pub fn new(num_y_vars: usize) -> Self {
        Self {
            pre: Array1::zeros(num_y_vars),
        }
    }
}

impl Prediction for GraphPredictor {
    fn compute(&mut self, _x: ArrayView1<f64>, cond: &ConditionKind) {
        // the match pass has already run the graph for this input
        let graph = cond
            .dgp_graph()
            .expect("graph-output prediction requires a DGP condition");
        for (var, pre) in self.pre.iter_mut().enumerate() {
            *pre = graph.state(1 + var);
        }
    }

    fn pre(&self) -> ArrayView1<'_, f64> {
        self.pre.view()
    }

    fn update(
        &mut self,
        _y: ArrayView1<f64>,
        _x: ArrayView1<f64>,
        _cond: &ConditionKind,
    ) -> Result<(), NumericFault> {
        Ok(())
    }
}

impl fmt::Display for GraphPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph-output:")?;
        for v in self.pre.iter() {
            write!(f, " {v:.5}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Condition, DgpGraphCondition};
    use crate::params::XcsfParamsBuilder;
    use crate::random::XcsfRandomGenerator;
    use ndarray::array;

    #[test]
    fn test_reads_designated_nodes() {
        let params = XcsfParamsBuilder::default().dgp_num_nodes(6).build().unwrap();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(101));
        let mut dgp = DgpGraphCondition::random(2, &params, &mut rng);
        let x = array![0.3, 0.6];
        dgp.matches(x.view());
        let expected = [dgp.graph().state(1), dgp.graph().state(2)];
        let cond = ConditionKind::DgpGraph(dgp);

        let mut pred = GraphPredictor::new(2);
        pred.compute(x.view(), &cond);
        assert_eq!(pred.pre()[0], expected[0]);
        assert_eq!(pred.pre()[1], expected[1]);
    }
}
