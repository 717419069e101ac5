#![doc = "Request and response types of the FopHELP endpoints."]
use crate::error::{Error, Result};
use http::{HeaderMap, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Body of the login request.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A parsed response body along with the status and headers it came with.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: DeserializeOwned,
{
    /// Parses the JSON body of a successful response.
    pub(crate) fn from_json(response: Response<Vec<u8>>) -> Result<Self> {
        let (parts, body) = check_status(response)?.into_parts();
        Ok(Self { status: parts.status, headers: parts.headers, data: serde_json::from_slice(&body)? })
    }
}

/// Fails with [`Error::UnexpectedStatus`] unless the status is in the success range.
pub(crate) fn check_status(response: Response<Vec<u8>>) -> Result<Response<Vec<u8>>> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(Error::UnexpectedStatus {
        status: response.status(),
        body: String::from_utf8_lossy(response.body()).into_owned(),
    })
}

/// One income record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub income: f64,
    pub dt: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub comment: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub currency: String,
    pub cash: bool,
    pub tax_payed: bool,
}

/// Body of `POST {api_version}/incomes/add`.
///
/// The amount is sent as a string, exactly as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIncomeRequest {
    pub income: String,
    pub date: String,
    pub comment: String,
    pub currency: String,
    pub cash: bool,
}

/// Result of adding an income: the id found in the confirmation text, and the text itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIncomeResponse {
    pub id: String,
    pub message: String,
}

/// One tax period record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tax {
    pub id: String,
    pub user_id: String,
    pub sum_incomes: f64,
    pub sum_expenses: f64,
    #[serde(rename = "amountEP")]
    pub amount_ep: f64,
    #[serde(rename = "amountPDV")]
    pub amount_pdv: f64,
    #[serde(rename = "amountESV")]
    pub amount_esv: f64,
    pub dt_from: String,
    pub dt_to: String,
    pub comment: String,
    pub tax_payed: bool,
    pub amount_military_tax: f64,
}
