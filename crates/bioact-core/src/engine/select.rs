use crate::core::models::descriptors::DescriptorMatrix;
use crate::core::models::features::{FeatureSchema, FeatureSubset, SchemaError};
use tracing::{debug, warn};

/// Projects a descriptor matrix onto the columns of a feature schema, in schema order.
///
/// Fails on the first schema column the matrix lacks; any further missing columns are
/// logged so a misconfigured schema can be diagnosed in one run.
pub fn select_subset(
    matrix: &DescriptorMatrix,
    schema: &FeatureSchema,
) -> Result<FeatureSubset, SchemaError> {
    let positions: Vec<Option<usize>> = schema
        .columns()
        .iter()
        .map(|name| matrix.column_position(name))
        .collect();

    let mut missing = schema
        .columns()
        .iter()
        .zip(&positions)
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| name.as_str());
    if let Some(first) = missing.next() {
        let rest: Vec<&str> = missing.collect();
        if !rest.is_empty() {
            warn!(
                "{} further schema column(s) are also missing: {}",
                rest.len(),
                rest.join(", ")
            );
        }
        return Err(SchemaError::MissingColumn(first.to_string()));
    }

    let positions: Vec<usize> = positions.into_iter().flatten().collect();
    let rows = matrix
        .rows()
        .iter()
        .map(|row| positions.iter().map(|&col| row[col]).collect())
        .collect();

    debug!(
        selected = positions.len(),
        available = matrix.n_columns(),
        "Selected descriptor subset"
    );

    Ok(FeatureSubset {
        columns: schema.columns().to_vec(),
        row_names: matrix.row_names().to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> DescriptorMatrix {
        DescriptorMatrix::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec!["ethanol".to_string(), "acetic_acid".to_string()],
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap()
    }

    fn schema(columns: &[&str]) -> FeatureSchema {
        FeatureSchema::new(columns.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    #[test]
    fn subset_follows_schema_order_not_matrix_order() {
        let subset = select_subset(&matrix(), &schema(&["C", "A"])).unwrap();
        assert_eq!(subset.columns, vec!["C", "A"]);
        assert_eq!(subset.row_names, vec!["ethanol", "acetic_acid"]);
        assert_eq!(subset.rows, vec![vec![3.0, 1.0], vec![6.0, 4.0]]);
        assert_eq!(subset.shape(), (2, 2));
    }

    #[test]
    fn missing_column_names_the_first_absent_one() {
        let err = select_subset(&matrix(), &schema(&["A", "X", "Y"])).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn(name) if name == "X"));
    }

    #[test]
    fn full_schema_keeps_every_value() {
        let subset = select_subset(&matrix(), &schema(&["A", "B", "C"])).unwrap();
        assert_eq!(subset.rows, matrix().rows());
    }
}
