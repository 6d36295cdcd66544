//! Translation between external node ids and internal solver indices.
//!
//! Internal layout for `N` nodes and `V` vehicles:
//!
//! ```text
//! [0 .. N-1)          delivery nodes, ascending node id, depot skipped
//! [N-1 .. N-1+V)      start sentinel of each vehicle
//! [N-1+V .. N-1+2V)   end sentinel of each vehicle
//! ```
//!
//! Sentinels all resolve to the depot node but stay distinct so that
//! reaching an end sentinel is a terminal transition for its vehicle.

use crate::error::RoutingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIndexMapper {
    num_nodes: usize,
    num_vehicles: usize,
    depot: usize,
    deliveries: Vec<usize>,
    node_to_index: Vec<Option<usize>>,
}

impl NodeIndexMapper {
    pub fn new(num_nodes: usize, num_vehicles: usize, depot: usize) -> Result<Self, RoutingError> {
        if num_vehicles < 1 {
            return Err(RoutingError::InvalidInput("at least one vehicle is required".to_string()));
        }
        if depot >= num_nodes {
            return Err(RoutingError::InvalidInput(format!(
                "depot {} is not one of the {} nodes",
                depot, num_nodes
            )));
        }
        if num_nodes < 2 {
            return Err(RoutingError::InvalidInput("delivery list is empty".to_string()));
        }

        let deliveries: Vec<usize> = (0..num_nodes).filter(|&node| node != depot).collect();
        let mut node_to_index = vec![None; num_nodes];
        for (index, &node) in deliveries.iter().enumerate() {
            node_to_index[node] = Some(index);
        }

        Ok(Self {
            num_nodes,
            num_vehicles,
            depot,
            deliveries,
            node_to_index,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn depot(&self) -> usize {
        self.depot
    }

    pub fn num_deliveries(&self) -> usize {
        self.deliveries.len()
    }

    /// Total number of internal indices, sentinels included.
    pub fn num_indices(&self) -> usize {
        self.deliveries.len() + 2 * self.num_vehicles
    }

    /// Internal indices of all delivery nodes, in ascending order.
    pub fn delivery_indices(&self) -> std::ops::Range<usize> {
        0..self.deliveries.len()
    }

    pub fn start(&self, vehicle: usize) -> usize {
        debug_assert!(vehicle < self.num_vehicles);
        self.deliveries.len() + vehicle
    }

    pub fn end(&self, vehicle: usize) -> usize {
        debug_assert!(vehicle < self.num_vehicles);
        self.deliveries.len() + self.num_vehicles + vehicle
    }

    pub fn is_start(&self, index: usize) -> bool {
        let first = self.deliveries.len();
        (first..first + self.num_vehicles).contains(&index)
    }

    pub fn is_end(&self, index: usize) -> bool {
        let first = self.deliveries.len() + self.num_vehicles;
        (first..first + self.num_vehicles).contains(&index)
    }

    /// Resolves any internal index, sentinels included, to its node id.
    pub fn index_to_node(&self, index: usize) -> usize {
        debug_assert!(index < self.num_indices(), "index {} out of range", index);
        self.deliveries.get(index).copied().unwrap_or(self.depot)
    }

    /// Internal index of a delivery node; `None` for the depot or an unknown id.
    pub fn node_to_index(&self, node: usize) -> Option<usize> {
        self.node_to_index.get(node).copied().flatten()
    }
}
