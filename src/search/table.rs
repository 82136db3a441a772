//! LanceDB table holding the embedded movie catalog.

use crate::error::{IndexError, Result};
use crate::search::models::{IndexedMovie, MovieMatch};
use arrow_array::cast::AsArray;
use arrow_array::types::{Float32Type, Int64Type};
use arrow_array::{Array, RecordBatchIterator};
use futures::TryStreamExt;
use std::sync::Arc;

const TABLE_NAME: &str = "movies";

/// Handle to the movies vector table.
///
/// The vector column's dimensionality is fixed per table generation and
/// chosen from whatever the active provider produced; [`MovieTable::rebuild`]
/// drops and recreates the table so a provider switch can change it.
pub struct MovieTable {
    table: lancedb::Table,
    dim: usize,
}

impl MovieTable {
    /// Open the existing movies table, reading the vector dimension from its
    /// schema. Fails with [`IndexError::Missing`] when no table has been
    /// built yet.
    pub async fn open(connection: &lancedb::Connection) -> Result<Self> {
        let table = connection
            .open_table(TABLE_NAME)
            .execute()
            .await
            .map_err(|_| IndexError::Missing)?;

        let schema = table
            .schema()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?;
        let dim = schema
            .field_with_name("vector")
            .ok()
            .and_then(|field| match field.data_type() {
                arrow_schema::DataType::FixedSizeList(_, dim) => Some(*dim as usize),
                _ => None,
            })
            .ok_or_else(|| {
                IndexError::LanceDb("movies table has no fixed-size vector column".to_string())
            })?;

        Ok(Self { table, dim })
    }

    /// Replace the table contents with a freshly embedded generation.
    ///
    /// Drops any previous table outright rather than merging, so rows from an
    /// earlier provider (possibly with a different dimension) never survive a
    /// rebuild. `rows` must be non-empty and share one vector dimension.
    pub async fn rebuild(
        connection: &lancedb::Connection,
        rows: &[IndexedMovie],
    ) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(
                IndexError::LanceDb("refusing to build an empty movies table".to_string()).into(),
            );
        };

        let dim = first.vector.len();
        for row in rows {
            if row.vector.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    expected: dim,
                    actual: row.vector.len(),
                }
                .into());
            }
        }

        if let Err(error) = connection.drop_table(TABLE_NAME, &[]).await {
            tracing::debug!(%error, "no previous movies table to drop");
        }

        let batch = Self::batch_from_rows(rows, dim)?;
        let batches = RecordBatchIterator::new(vec![Ok(batch)], Arc::new(Self::schema(dim)));

        let table = connection
            .create_table(TABLE_NAME, Box::new(batches))
            .execute()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?;

        Ok(Self { table, dim })
    }

    /// Vector dimension of the current table generation.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Nearest-neighbor search by cosine distance.
    ///
    /// Returns up to `top` matches after skipping the first `skip` ranked
    /// entries, ordered closest first. Scores are `1 - distance`, clamped
    /// to `[0, 1]`.
    pub async fn nearest(
        &self,
        query_vector: &[f32],
        top: usize,
        skip: usize,
    ) -> Result<Vec<MovieMatch>> {
        if query_vector.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                actual: query_vector.len(),
            }
            .into());
        }

        use lancedb::query::{ExecutableQuery, QueryBase};

        let fetch = top.saturating_add(skip);
        let results: Vec<arrow_array::RecordBatch> = self
            .table
            .query()
            .nearest_to(query_vector)
            .map_err(|e| IndexError::LanceDb(e.to_string()))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(fetch)
            .execute()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?;

        let mut matches = Vec::new();
        for batch in results {
            if let (Some(key_col), Some(title_col), Some(dist_col)) = (
                batch.column_by_name("key"),
                batch.column_by_name("title"),
                batch.column_by_name("_distance"),
            ) {
                let keys: &arrow_array::PrimitiveArray<Int64Type> = key_col.as_primitive();
                let titles: &arrow_array::StringArray = title_col.as_string::<i32>();
                let dists: &arrow_array::PrimitiveArray<Float32Type> = dist_col.as_primitive();

                for i in 0..keys.len() {
                    if keys.is_valid(i) && dists.is_valid(i) {
                        matches.push(MovieMatch {
                            key: keys.value(i),
                            title: titles.value(i).to_string(),
                            score: (1.0 - dists.value(i)).clamp(0.0, 1.0),
                        });
                    }
                }
            }
        }

        Ok(matches.into_iter().skip(skip).take(top).collect())
    }

    /// Count all rows in the table.
    pub async fn count(&self) -> Result<usize> {
        use lancedb::query::{ExecutableQuery, QueryBase};

        let results: Vec<arrow_array::RecordBatch> = self
            .table
            .query()
            .select(lancedb::query::Select::columns(&["key"]))
            .execute()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?;

        Ok(results.iter().map(|b| b.num_rows()).sum())
    }

    /// List all catalog keys currently stored, sorted ascending.
    pub async fn list_keys(&self) -> Result<Vec<i64>> {
        use lancedb::query::{ExecutableQuery, QueryBase};

        let results: Vec<arrow_array::RecordBatch> = self
            .table
            .query()
            .select(lancedb::query::Select::columns(&["key"]))
            .execute()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?;

        let mut keys = Vec::new();
        for batch in results {
            if let Some(key_col) = batch.column_by_name("key") {
                let values: &arrow_array::PrimitiveArray<Int64Type> = key_col.as_primitive();
                for index in 0..values.len() {
                    if values.is_valid(index) {
                        keys.push(values.value(index));
                    }
                }
            }
        }

        keys.sort_unstable();
        Ok(keys)
    }

    /// Distinct provider names found in the stored rows. A consistent table
    /// generation contains exactly one.
    pub async fn distinct_providers(&self) -> Result<Vec<String>> {
        use lancedb::query::{ExecutableQuery, QueryBase};

        let results: Vec<arrow_array::RecordBatch> = self
            .table
            .query()
            .select(lancedb::query::Select::columns(&["provider"]))
            .execute()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| IndexError::LanceDb(e.to_string()))?;

        let mut providers = Vec::new();
        for batch in results {
            if let Some(provider_col) = batch.column_by_name("provider") {
                let values: &arrow_array::StringArray = provider_col.as_string::<i32>();
                for index in 0..values.len() {
                    if values.is_valid(index) {
                        let value = values.value(index).to_string();
                        if !providers.contains(&value) {
                            providers.push(value);
                        }
                    }
                }
            }
        }

        providers.sort();
        Ok(providers)
    }

    fn batch_from_rows(rows: &[IndexedMovie], dim: usize) -> Result<arrow_array::RecordBatch> {
        use arrow_array::{FixedSizeListArray, Int64Array, RecordBatch, StringArray};

        let key_array = Int64Array::from(rows.iter().map(|r| r.key).collect::<Vec<_>>());
        let title_array = StringArray::from(rows.iter().map(|r| r.title.as_str()).collect::<Vec<_>>());
        let description_array =
            StringArray::from(rows.iter().map(|r| r.description.as_str()).collect::<Vec<_>>());
        let provider_array =
            StringArray::from(rows.iter().map(|r| r.provider.as_str()).collect::<Vec<_>>());
        let vector_array = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            rows.iter()
                .map(|r| Some(r.vector.iter().map(|v| Some(*v)).collect::<Vec<_>>())),
            dim as i32,
        );

        RecordBatch::try_new(
            Arc::new(Self::schema(dim)),
            vec![
                Arc::new(key_array) as arrow_array::ArrayRef,
                Arc::new(title_array) as arrow_array::ArrayRef,
                Arc::new(description_array) as arrow_array::ArrayRef,
                Arc::new(provider_array) as arrow_array::ArrayRef,
                Arc::new(vector_array) as arrow_array::ArrayRef,
            ],
        )
        .map_err(|e| IndexError::LanceDb(e.to_string()).into())
    }

    fn schema(dim: usize) -> arrow_schema::Schema {
        arrow_schema::Schema::new(vec![
            arrow_schema::Field::new("key", arrow_schema::DataType::Int64, false),
            arrow_schema::Field::new("title", arrow_schema::DataType::Utf8, false),
            arrow_schema::Field::new("description", arrow_schema::DataType::Utf8, false),
            arrow_schema::Field::new("provider", arrow_schema::DataType::Utf8, false),
            arrow_schema::Field::new(
                "vector",
                arrow_schema::DataType::FixedSizeList(
                    Arc::new(arrow_schema::Field::new(
                        "item",
                        arrow_schema::DataType::Float32,
                        true,
                    )),
                    dim as i32,
                ),
                false,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, IndexError};
    use crate::search::models::IndexedMovie;

    fn row(key: i64, title: &str, provider: &str, vector: Vec<f32>) -> IndexedMovie {
        IndexedMovie {
            key,
            title: title.to_string(),
            description: format!("{title} description"),
            provider: provider.to_string(),
            vector,
        }
    }

    async fn connect(temp: &tempfile::TempDir) -> lancedb::Connection {
        lancedb::connect(temp.path().to_str().expect("path utf8"))
            .execute()
            .await
            .expect("connect lancedb")
    }

    #[tokio::test]
    async fn rebuild_overwrites_previous_generation() {
        let temp = tempfile::tempdir().expect("tempdir");
        let connection = connect(&temp).await;

        let first = vec![
            row(1, "A", "alpha", vec![1.0, 0.0, 0.0, 0.0]),
            row(2, "B", "alpha", vec![0.0, 1.0, 0.0, 0.0]),
        ];
        let table = MovieTable::rebuild(&connection, &first)
            .await
            .expect("first rebuild");
        assert_eq!(table.dim(), 4);
        assert_eq!(table.count().await.expect("count"), 2);

        // Second generation: different provider, different dimension, fewer rows.
        let second = vec![row(7, "C", "beta", vec![0.0; 8])];
        let table = MovieTable::rebuild(&connection, &second)
            .await
            .expect("second rebuild");

        assert_eq!(table.dim(), 8);
        assert_eq!(table.count().await.expect("count"), 1);
        assert_eq!(table.list_keys().await.expect("keys"), vec![7]);
        assert_eq!(
            table.distinct_providers().await.expect("providers"),
            vec!["beta".to_string()]
        );

        let reopened = MovieTable::open(&connection).await.expect("open");
        assert_eq!(reopened.dim(), 8);
    }

    #[tokio::test]
    async fn rebuild_rejects_mixed_dimensions() {
        let temp = tempfile::tempdir().expect("tempdir");
        let connection = connect(&temp).await;

        let rows = vec![
            row(1, "A", "alpha", vec![1.0, 0.0]),
            row(2, "B", "alpha", vec![1.0, 0.0, 0.0]),
        ];
        let error = MovieTable::rebuild(&connection, &rows)
            .await
            .expect_err("mixed dimensions must fail");
        assert!(matches!(
            error,
            Error::Index(IndexError::DimensionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn open_before_any_rebuild_reports_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let connection = connect(&temp).await;

        let error = MovieTable::open(&connection)
            .await
            .expect_err("no table yet");
        assert!(matches!(error, Error::Index(IndexError::Missing)));
    }

    #[tokio::test]
    async fn nearest_ranks_closest_first_and_honors_top_and_skip() {
        let temp = tempfile::tempdir().expect("tempdir");
        let connection = connect(&temp).await;

        let rows = vec![
            row(1, "Exact", "alpha", vec![1.0, 0.0, 0.0, 0.0]),
            row(2, "Close", "alpha", {
                let norm = (0.9_f32 * 0.9 + 0.1 * 0.1).sqrt();
                vec![0.9 / norm, 0.1 / norm, 0.0, 0.0]
            }),
            row(3, "Far", "alpha", vec![0.0, 1.0, 0.0, 0.0]),
        ];
        let table = MovieTable::rebuild(&connection, &rows).await.expect("rebuild");

        let query = vec![1.0, 0.0, 0.0, 0.0];
        let matches = table.nearest(&query, 3, 0).await.expect("nearest");
        let keys: Vec<i64> = matches.iter().map(|m| m.key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert!(matches[0].score > matches[1].score);
        assert!(matches[1].score > matches[2].score);

        let skipped = table.nearest(&query, 5, 1).await.expect("nearest skip");
        let keys: Vec<i64> = skipped.iter().map(|m| m.key).collect();
        assert_eq!(keys, vec![2, 3]);

        let top_one = table.nearest(&query, 1, 0).await.expect("nearest top 1");
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].key, 1);
    }

    #[tokio::test]
    async fn nearest_rejects_wrong_query_dimension() {
        let temp = tempfile::tempdir().expect("tempdir");
        let connection = connect(&temp).await;

        let rows = vec![row(1, "A", "alpha", vec![1.0, 0.0, 0.0, 0.0])];
        let table = MovieTable::rebuild(&connection, &rows).await.expect("rebuild");

        let error = table
            .nearest(&[1.0, 0.0], 3, 0)
            .await
            .expect_err("dimension mismatch");
        assert!(matches!(
            error,
            Error::Index(IndexError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }
}
