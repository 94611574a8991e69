// src/models/crm.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value; // <--- A chave para o JSONB
use sqlx::FromRow;

use crate::common::serde_utils::double_option;

// Etapa do funil de vendas
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    pub id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

// Imóvel
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    pub tenant_id: i32,
    pub r#type: String, // apartment | house | land | commercial
    pub title: Option<String>,

    // Endereço desmembrado
    pub address_street: Option<String>,
    pub address_number: Option<String>,
    pub address_complement: Option<String>,
    pub address_neighborhood: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,

    // NUMERIC(14,2) no banco; serializado como número JSON
    pub value_sale: Option<Decimal>,
    pub value_rent: Option<Decimal>,

    pub status: String,
    pub description: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub parking_spaces: Option<i32>,
    pub area_m2: Option<Decimal>,
    pub code: Option<String>,
    pub is_highlight: Option<bool>,
    pub metadata: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPhoto {
    pub id: i32,
    pub property_id: i32,
    pub url: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

// Detalhe de imóvel com a galeria embutida
#[derive(Debug, Serialize)]
pub struct PropertyWithPhotos {
    #[serde(flatten)]
    pub property: Property,
    pub photos: Vec<PropertyPhoto>,
}

// Etiqueta de segmentação
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub slug: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Contato / lead
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub tenant_id: i32,
    pub name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub source: Option<String>,
    pub pipeline_stage_id: Option<i32>,
    pub lead_score: Option<i32>,
    pub opt_in: Option<bool>,
    pub opt_in_at: Option<DateTime<Utc>>,
    pub whatsapp_validated: Option<bool>,
    pub notes: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Detalhe de contato com as tags embutidas
#[derive(Debug, Serialize)]
pub struct ContactWithTags {
    #[serde(flatten)]
    pub contact: Contact,
    pub tags: Vec<Tag>,
}

// Tarefa de follow-up
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub tenant_id: i32,
    pub contact_id: Option<i32>,
    pub property_id: Option<i32>,
    pub assigned_to_id: Option<i32>,
    pub title: String,
    pub r#type: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Payloads (os "formulários" da API)
// ---
// Nos PATCH, `Option<Option<T>>` com `double_option` separa "campo ausente"
// de "null explícito": só colunas anuláveis aceitam o null para limpar.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyPayload {
    pub r#type: Option<String>,
    pub title: Option<String>,
    pub address_street: Option<String>,
    pub address_number: Option<String>,
    pub address_complement: Option<String>,
    pub address_neighborhood: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub value_sale: Option<Decimal>,
    pub value_rent: Option<Decimal>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub parking_spaces: Option<i32>,
    pub area_m2: Option<Decimal>,
    pub code: Option<String>,
    pub is_highlight: Option<bool>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyPayload {
    pub r#type: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_street: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_complement: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_neighborhood: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_state: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address_zip: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub value_sale: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub value_rent: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bedrooms: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bathrooms: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub parking_spaces: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub area_m2: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub code: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub is_highlight: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    pub metadata: Option<Option<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactPayload {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub source: Option<String>,
    pub pipeline_stage_id: Option<i32>,
    pub lead_score: Option<i32>,
    pub opt_in: Option<bool>,
    pub notes: Option<String>,
    pub metadata: Option<Value>,
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactPayload {
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub source: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub pipeline_stage_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lead_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub opt_in: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    pub opt_in_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub whatsapp_validated: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub metadata: Option<Option<Value>>,
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    pub contact_id: Option<i32>,
    pub property_id: Option<i32>,
    pub assigned_to_id: Option<i32>,
    pub title: Option<String>,
    pub r#type: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub property_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub r#type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imovel_serializa_em_camel_case() {
        let property = Property {
            id: 1,
            tenant_id: 1,
            r#type: "apartment".to_string(),
            title: Some("Apto 2 dorms em Pinheiros".to_string()),
            address_street: None,
            address_number: None,
            address_complement: None,
            address_neighborhood: Some("Pinheiros".to_string()),
            address_city: Some("São Paulo".to_string()),
            address_state: Some("SP".to_string()),
            address_zip: None,
            value_sale: Some(Decimal::new(45000000, 2)), // 450_000.00
            value_rent: None,
            status: "available".to_string(),
            description: None,
            bedrooms: Some(2),
            bathrooms: Some(1),
            parking_spaces: Some(1),
            area_m2: None,
            code: Some("AP-001".to_string()),
            is_highlight: Some(false),
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["type"], "apartment");
        assert_eq!(json["addressNeighborhood"], "Pinheiros");
        assert_eq!(json["valueSale"], 450_000.0);
        assert!(json.get("address_neighborhood").is_none());
    }

    #[test]
    fn patch_de_tarefa_distingue_null_de_ausente() {
        let body: UpdateTaskPayload =
            serde_json::from_str(r#"{"completedAt": null, "title": "Ligar de volta"}"#).unwrap();
        assert_eq!(body.completed_at, Some(None)); // null limpa a coluna
        assert!(body.due_at.is_none()); // ausente não mexe
        assert_eq!(body.title.as_deref(), Some("Ligar de volta"));

        let body: UpdateTaskPayload =
            serde_json::from_str(r#"{"dueAt": "2025-06-01T15:00:00Z"}"#).unwrap();
        assert!(matches!(body.due_at, Some(Some(_))));
    }

    #[test]
    fn contato_com_tags_achata_o_contato() {
        let contact = Contact {
            id: 10,
            tenant_id: 1,
            name: Some("Beatriz".to_string()),
            phone: "5511999990000".to_string(),
            email: None,
            source: Some("whatsapp".to_string()),
            pipeline_stage_id: None,
            lead_score: Some(0),
            opt_in: Some(true),
            opt_in_at: None,
            whatsapp_validated: Some(false),
            notes: None,
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let with_tags = ContactWithTags {
            contact,
            tags: vec![],
        };

        let json = serde_json::to_value(&with_tags).unwrap();
        assert_eq!(json["phone"], "5511999990000");
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json.get("contact").is_none());
    }
}
