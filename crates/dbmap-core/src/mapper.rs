//! Result row mapping.
//!
//! [`RowMapper`] turns cursor rows into destination values. The first row
//! fixes a [`ScanPlan`]: whether the destination is a scalar or a record and,
//! per column, where the scanned value goes. Later rows reuse that plan.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::catalog::{FieldCatalog, FieldDescriptor};
use crate::convert::{
    ColumnConverter, column_converter, convert_column_value, converter_finish, converter_target,
};
use crate::cursor::{ColumnType, Discard, RowCursor, ScanTarget, ValueSlot};
use crate::error::{Error, Result};
use crate::record::{FieldKind, Record};
use crate::value::{FieldType, Value};

/// Whether a destination takes a single column or a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationShape {
    Scalar,
    Record,
}

/// Something a result row can be scanned into.
///
/// Implemented for every `Record + Default` and for the builtin scalar types.
/// Other single-column types can implement it with
/// [`DestinationShape::Scalar`].
pub trait Destination: Default + 'static {
    fn shape() -> DestinationShape;

    /// Field catalog for record destinations.
    fn catalog() -> Result<Option<Arc<FieldCatalog>>> {
        Ok(None)
    }

    fn assign_scalar(&mut self, value: Value) -> Result<()> {
        let _ = value;
        Err(Error::mapping(
            "assign_scalar",
            "destination is not a scalar",
        ))
    }

    fn assign_field(&mut self, field: &'static str, value: Value) -> Result<()> {
        let _ = value;
        Err(Error::mapping(
            "assign_field",
            format!("destination has no field `{}`", field),
        ))
    }
}

impl<T: Record + Default> Destination for T {
    fn shape() -> DestinationShape {
        DestinationShape::Record
    }

    fn catalog() -> Result<Option<Arc<FieldCatalog>>> {
        FieldCatalog::of::<T>().map(Some)
    }

    fn assign_field(&mut self, field: &'static str, value: Value) -> Result<()> {
        if self.set_field(field, value)? {
            Ok(())
        } else {
            Err(Error::mapping(
                "assign_field",
                format!("`{}` has no field `{}`", T::record_decl().type_name, field),
            ))
        }
    }
}

macro_rules! impl_scalar_destination {
    ($($ty:ty),+ $(,)?) => {
        $(impl Destination for $ty {
            fn shape() -> DestinationShape {
                DestinationShape::Scalar
            }

            fn assign_scalar(&mut self, value: Value) -> Result<()> {
                *self = <$ty as FieldType>::from_value(value)?;
                Ok(())
            }
        })+
    };
}

impl_scalar_destination!(
    bool,
    i8,
    i16,
    i32,
    i64,
    f32,
    f64,
    String,
    Vec<u8>,
    Decimal,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    serde_json::Value,
);

impl Destination for Value {
    fn shape() -> DestinationShape {
        DestinationShape::Scalar
    }

    fn assign_scalar(&mut self, value: Value) -> Result<()> {
        *self = value;
        Ok(())
    }
}

/// Where one column's scanned value goes.
#[derive(Clone)]
pub enum ScanSlot {
    /// Straight into a record field
    Field(&'static str),
    /// Into the scalar destination
    Scalar,
    /// Unmapped column
    Discard,
    /// Through a registered converter, then into a field (or the scalar
    /// destination when `field` is `None`)
    Convert {
        converter: Arc<dyn ColumnConverter>,
        field: Option<&'static str>,
    },
}

impl std::fmt::Debug for ScanSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanSlot::Field(name) => f.debug_tuple("Field").field(name).finish(),
            ScanSlot::Scalar => f.write_str("Scalar"),
            ScanSlot::Discard => f.write_str("Discard"),
            ScanSlot::Convert { field, .. } => {
                f.debug_struct("Convert").field("field", field).finish_non_exhaustive()
            }
        }
    }
}

/// Per-cursor scan layout, built from the first row's column metadata.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub shape: DestinationShape,
    pub columns: Vec<ColumnType>,
    pub slots: Vec<ScanSlot>,
}

impl ScanPlan {
    pub fn build<T: Destination>(columns: &[ColumnType]) -> Result<ScanPlan> {
        let shape = T::shape();
        let slots = match shape {
            DestinationShape::Scalar => {
                if columns.len() != 1 {
                    return Err(Error::mapping(
                        "scan_plan",
                        format!(
                            "scalar destination needs exactly one column, cursor has {}",
                            columns.len()
                        ),
                    ));
                }
                let slot = match column_converter(&columns[0].database_type_name) {
                    Some(converter) => ScanSlot::Convert {
                        converter,
                        field: None,
                    },
                    None => ScanSlot::Scalar,
                };
                vec![slot]
            }
            DestinationShape::Record => {
                let catalog = T::catalog()?.ok_or_else(|| {
                    Error::structure("scan_plan", "record destination has no field catalog")
                })?;
                columns
                    .iter()
                    .map(|column| {
                        let Some(field) = resolve_column(&catalog, &column.name) else {
                            tracing::trace!(column = %column.name, "Discarding unmapped column");
                            return ScanSlot::Discard;
                        };
                        match column_converter(&column.database_type_name) {
                            Some(converter) => ScanSlot::Convert {
                                converter,
                                field: Some(field.name),
                            },
                            None => ScanSlot::Field(field.name),
                        }
                    })
                    .collect()
            }
        };

        tracing::debug!(
            shape = ?shape,
            columns = columns.len(),
            "Built scan plan"
        );
        Ok(ScanPlan {
            shape,
            columns: columns.to_vec(),
            slots,
        })
    }
}

/// Column → field: column map, then export name, then export name with
/// underscores ignored on both sides. The last step takes the first declared
/// match.
fn resolve_column<'a>(catalog: &'a FieldCatalog, column: &str) -> Option<&'a FieldDescriptor> {
    let lower = column.to_lowercase();
    let field = catalog
        .field_by_column(&lower)
        .or_else(|| catalog.export_field(&lower))
        .or_else(|| {
            let joined = lower.replace('_', "");
            catalog
                .ordered_export_fields()
                .find(|(name, _)| name.replace('_', "") == joined)
                .map(|(_, field)| field)
        })?;
    (field.kind != FieldKind::Record).then_some(field)
}

/// Maps cursor rows into `T`.
pub struct RowMapper<T> {
    plan: Option<ScanPlan>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Destination> Default for RowMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Destination> RowMapper<T> {
    pub fn new() -> Self {
        Self {
            plan: None,
            _marker: PhantomData,
        }
    }

    /// The cached plan, once the first row has been mapped.
    pub fn plan(&self) -> Option<&ScanPlan> {
        self.plan.as_ref()
    }

    /// Map the cursor's current row.
    pub fn map_row(&mut self, cursor: &mut dyn RowCursor) -> Result<T> {
        if self.plan.is_none() {
            self.plan = Some(ScanPlan::build::<T>(cursor.column_types())?);
        }
        let Some(plan) = self.plan.as_ref() else {
            return Err(Error::structure("map_row", "scan plan missing"));
        };

        let nulls: Vec<bool> = (0..plan.slots.len()).map(|i| cursor.is_null(i)).collect();
        let mut targets: Vec<Box<dyn ScanTarget>> = Vec::with_capacity(plan.slots.len());
        for (index, slot) in plan.slots.iter().enumerate() {
            let target: Box<dyn ScanTarget> = match slot {
                _ if nulls[index] => Box::new(Discard),
                ScanSlot::Discard => Box::new(Discard),
                ScanSlot::Field(_) | ScanSlot::Scalar => Box::new(ValueSlot::new()),
                ScanSlot::Convert { converter, .. } => {
                    converter_target(converter.as_ref(), &plan.columns[index])?
                }
            };
            targets.push(target);
        }

        cursor
            .scan(&mut targets)
            .map_err(|source| Error::scan("map_row", source))?;

        let mut dest = T::default();
        for (index, (slot, target)) in plan.slots.iter().zip(targets.iter_mut()).enumerate() {
            if nulls[index] {
                continue;
            }
            let column = &plan.columns[index];
            match slot {
                ScanSlot::Discard => {}
                ScanSlot::Field(field) => dest
                    .assign_field(*field, target.take())
                    .map_err(|e| e.with_column(&column.name))?,
                ScanSlot::Scalar => dest
                    .assign_scalar(target.take())
                    .map_err(|e| e.with_column(&column.name))?,
                ScanSlot::Convert { converter, field } => {
                    let value = converter_finish(converter.as_ref(), column, target.take())?;
                    let assigned = match field {
                        Some(field) => dest.assign_field(*field, value),
                        None => dest.assign_scalar(value),
                    };
                    assigned.map_err(|e| e.with_column(&column.name))?;
                }
            }
        }
        Ok(dest)
    }
}

fn advance(cursor: &mut dyn RowCursor) -> Result<bool> {
    cursor
        .advance()
        .map_err(|source| Error::scan("advance", source))
}

/// Map every remaining row.
pub fn query_all<T: Destination>(cursor: &mut dyn RowCursor) -> Result<Vec<T>> {
    let mut mapper = RowMapper::<T>::new();
    let mut rows = Vec::new();
    while advance(cursor)? {
        rows.push(mapper.map_row(cursor)?);
    }
    Ok(rows)
}

/// Map the first row, if any. Remaining rows are left unread.
pub fn query_one<T: Destination>(cursor: &mut dyn RowCursor) -> Result<Option<T>> {
    if !advance(cursor)? {
        return Ok(None);
    }
    RowMapper::<T>::new().map_row(cursor).map(Some)
}

/// Map every remaining row into a column name → value map.
///
/// Registered converters apply as for typed rows; other columns go through
/// [`convert_column_value`]. NULL columns map to `Value::Null`.
pub fn query_maps(cursor: &mut dyn RowCursor) -> Result<Vec<IndexMap<String, Value>>> {
    let columns = cursor.column_types().to_vec();
    let converters: Vec<Option<Arc<dyn ColumnConverter>>> = columns
        .iter()
        .map(|c| column_converter(&c.database_type_name))
        .collect();

    let mut rows = Vec::new();
    while advance(cursor)? {
        let nulls: Vec<bool> = (0..columns.len()).map(|i| cursor.is_null(i)).collect();
        let mut targets: Vec<Box<dyn ScanTarget>> = Vec::with_capacity(columns.len());
        for (index, converter) in converters.iter().enumerate() {
            let target: Box<dyn ScanTarget> = match converter {
                _ if nulls[index] => Box::new(Discard),
                Some(converter) => converter_target(converter.as_ref(), &columns[index])?,
                None => Box::new(ValueSlot::new()),
            };
            targets.push(target);
        }
        cursor
            .scan(&mut targets)
            .map_err(|source| Error::scan("query_maps", source))?;

        let mut row = IndexMap::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let value = if nulls[index] {
                Value::Null
            } else {
                let scanned = targets[index].take();
                match &converters[index] {
                    Some(converter) => converter_finish(converter.as_ref(), column, scanned)?,
                    None => convert_column_value(scanned, &column.database_type_name)
                        .map_err(|e| e.with_column(&column.name))?,
                }
            };
            row.insert(column.name.clone(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}
