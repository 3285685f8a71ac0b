//! VNPay redirect handling
//!
//! Top-ups leave the app for the VNPay gateway, which redirects back to
//! the return URL with the outcome in its query string.

use reqwest::Url;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ClientError, ClientResult};

const SUCCESS_CODE: &str = "00";

/// Outcome carried by a VNPay return URL.
#[derive(Debug, Clone, PartialEq)]
pub struct VnPayReturn {
    pub response_code: String,
    pub transaction_status: Option<String>,
    /// Amount in dong (`vnp_Amount` is sent in hundredths)
    pub amount: f64,
    pub txn_ref: Option<String>,
    pub bank_code: Option<String>,
    pub pay_date: Option<String>,
}

impl VnPayReturn {
    pub fn parse(return_url: &str) -> ClientResult<Self> {
        let url = Url::parse(return_url)
            .map_err(|e| ClientError::InvalidResponse(format!("invalid VNPay return URL: {e}")))?;

        let mut response_code = None;
        let mut result = Self {
            response_code: String::new(),
            transaction_status: None,
            amount: 0.0,
            txn_ref: None,
            bank_code: None,
            pay_date: None,
        };
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "vnp_ResponseCode" => response_code = Some(value.into_owned()),
                "vnp_TransactionStatus" => result.transaction_status = Some(value.into_owned()),
                "vnp_Amount" => {
                    let raw: u64 = value.parse().map_err(|_| {
                        ClientError::InvalidResponse(format!("invalid vnp_Amount: {value}"))
                    })?;
                    result.amount = (Decimal::from(raw) / Decimal::ONE_HUNDRED)
                        .to_f64()
                        .unwrap_or_default();
                }
                "vnp_TxnRef" => result.txn_ref = Some(value.into_owned()),
                "vnp_BankCode" => result.bank_code = Some(value.into_owned()),
                "vnp_PayDate" => result.pay_date = Some(value.into_owned()),
                _ => {}
            }
        }
        result.response_code = response_code
            .ok_or_else(|| ClientError::InvalidResponse("missing vnp_ResponseCode".into()))?;
        Ok(result)
    }

    /// Both the gateway response and the transaction status report success.
    pub fn is_success(&self) -> bool {
        self.response_code == SUCCESS_CODE
            && self
                .transaction_status
                .as_deref()
                .is_none_or(|s| s == SUCCESS_CODE)
    }

    /// Vietnamese explanation of the gateway response code.
    pub fn message(&self) -> &'static str {
        match self.response_code.as_str() {
            "00" => "Giao dịch thành công",
            "07" => "Giao dịch bị nghi ngờ gian lận",
            "09" => "Thẻ/Tài khoản chưa đăng ký dịch vụ InternetBanking",
            "11" => "Đã hết hạn chờ thanh toán",
            "12" => "Thẻ/Tài khoản bị khóa",
            "24" => "Khách hàng hủy giao dịch",
            "51" => "Tài khoản không đủ số dư",
            "65" => "Tài khoản đã vượt quá hạn mức giao dịch trong ngày",
            "75" => "Ngân hàng thanh toán đang bảo trì",
            _ => "Giao dịch không thành công",
        }
    }
}
