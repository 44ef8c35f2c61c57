//! Schema parsing and payload encoding.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, Bytes, B256};

use crate::attestation::types::{AttestError, AttestResult};
use crate::config::AttestationConfig;

/// One `"<type> <name>"` entry of a schema string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub ty: DynSolType,
}

/// Encodes named values under a schema such as `"bytes32 contentHash"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEncoder {
    schema: String,
    fields: Vec<SchemaField>,
}

impl SchemaEncoder {
    /// Parse a comma-separated list of `"<solidity type> <name>"` pairs.
    pub fn parse(schema: &str) -> AttestResult<Self> {
        let mut fields: Vec<SchemaField> = Vec::new();

        for entry in schema.split(',') {
            let mut tokens = entry.split_whitespace();
            let (ty, name) = match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(ty), Some(name), None) => (ty, name),
                _ => {
                    return Err(AttestError::Encoding(format!(
                        "schema entry {:?} is not \"<type> <name>\"",
                        entry.trim()
                    )))
                }
            };

            let ty = DynSolType::parse(ty)
                .map_err(|e| AttestError::Encoding(format!("schema type {:?}: {}", ty, e)))?;
            if fields.iter().any(|f| f.name == name) {
                return Err(AttestError::Encoding(format!(
                    "schema field {:?} declared twice",
                    name
                )));
            }
            fields.push(SchemaField {
                name: name.to_string(),
                ty,
            });
        }

        Ok(Self {
            schema: schema.trim().to_string(),
            fields,
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// ABI-encode `values` (by field name) as the schema's parameter tuple.
    ///
    /// Every field needs exactly one value; each value is coerced from its
    /// string form to the field's type.
    pub fn encode_data(&self, values: &[(&str, &str)]) -> AttestResult<Bytes> {
        if let Some((name, _)) = values.iter().find(|(name, _)| self.field(name).is_none()) {
            return Err(AttestError::Encoding(format!(
                "value for unknown field {:?}",
                name
            )));
        }

        let mut encoded = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let raw = values
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, value)| *value)
                .ok_or_else(|| {
                    AttestError::Encoding(format!("missing value for {:?}", field.name))
                })?;

            let value = field.ty.coerce_str(raw).map_err(|e| {
                AttestError::Encoding(format!("{} {}: {}", field.ty, field.name, e))
            })?;
            encoded.push(value);
        }

        Ok(DynSolValue::Tuple(encoded).abi_encode_params().into())
    }
}

/// A registered schema: its UID plus how to encode data for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub uid: B256,
    pub encoder: SchemaEncoder,
}

/// Immutable attestation target, resolved from configuration once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationSettings {
    pub contract_address: Address,
    pub schema: SchemaDescriptor,
}

impl AttestationSettings {
    pub fn from_config(config: &AttestationConfig) -> AttestResult<Self> {
        let contract_address = config.contract_address.parse().map_err(|e| {
            AttestError::Encoding(format!(
                "contract address {:?}: {}",
                config.contract_address, e
            ))
        })?;
        let uid = config.schema_uid.parse().map_err(|e| {
            AttestError::Encoding(format!("schema UID {:?}: {}", config.schema_uid, e))
        })?;

        Ok(Self {
            contract_address,
            schema: SchemaDescriptor {
                uid,
                encoder: SchemaEncoder::parse(&config.schema)?,
            },
        })
    }
}
