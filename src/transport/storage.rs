use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::{FileUpload, StorageType, UploadedFile};

#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    file: String,
    #[serde(rename = "type")]
    storage_type: StorageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadJsonResponse {
    file_id: String,
}

/// Encode the `storage/v1/files` body; file content travels as standard base64.
pub fn encode_upload_body(upload: &FileUpload) -> Result<String, TransportError> {
    let body = UploadBody {
        file: STANDARD.encode(upload.bytes()),
        storage_type: upload.storage_type(),
        name: upload.name(),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn decode_upload_response(json: &str) -> Result<UploadedFile, TransportError> {
    let parsed: UploadJsonResponse = serde_json::from_str(json)?;
    Ok(UploadedFile {
        file_id: parsed.file_id,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn upload_body_is_base64_with_storage_type() {
        let upload = FileUpload::new(b"hello".to_vec(), StorageType::BmsWide)
            .unwrap()
            .with_name("wide.png");
        let value: Value = serde_json::from_str(&encode_upload_body(&upload).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"file": "aGVsbG8=", "type": "BMS_WIDE", "name": "wide.png"})
        );
    }

    #[test]
    fn name_is_optional() {
        let upload = FileUpload::new(vec![1, 2, 3], StorageType::Mms).unwrap();
        let value: Value = serde_json::from_str(&encode_upload_body(&upload).unwrap()).unwrap();
        assert!(value.get("name").is_none());
        assert_eq!(value["file"], json!("AQID"));
    }

    #[test]
    fn upload_response_yields_file_id() {
        let json = r#"{"fileId": "ST01FZ240615", "type": "MMS", "url": "https://example.com/f"}"#;
        assert_eq!(decode_upload_response(json).unwrap().file_id, "ST01FZ240615");
        assert!(decode_upload_response("{}").is_err());
    }
}
