// src/handlers/palette.rs
use serde::Serialize;

use crate::models::Company;

pub fn company_color(company: Company) -> &'static str {
    match company {
        Company::Meta => "#1877F2",
        Company::Apple => "#555555",
        Company::Amazon => "#FF9900",
        Company::Netflix => "#E50914",
        Company::Alphabet => "#4285F4",
    }
}

#[derive(Debug, Serialize)]
pub struct CompanyInfo {
    pub company: Company,
    pub color: &'static str,
}

pub fn palette_for(companies: &[Company]) -> Vec<CompanyInfo> {
    companies
        .iter()
        .map(|&company| CompanyInfo {
            company,
            color: company_color(company),
        })
        .collect()
}
