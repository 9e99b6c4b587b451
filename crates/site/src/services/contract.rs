//! Rental contract PDF generation.
//!
//! Produces the downloadable contract offered on the payment confirmation
//! page. Layout is a single A4 page: header, contracting-party block, bike
//! block, rental period, amounts, standard clauses, and signature lines.

use chrono::NaiveDateTime;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::Bike;
use crate::filters::format_brl;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Errors that can occur while generating a contract PDF.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The PDF backend failed.
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Everything the contract prints.
#[derive(Debug, Clone)]
pub struct ContractData {
    pub customer_name: String,
    /// CPF, display-masked.
    pub cpf: String,
    /// Phone, display-masked.
    pub celular: String,
    pub email: String,
    pub bike: Bike,
    pub rental_start: NaiveDateTime,
    pub expected_return: NaiveDateTime,
    pub total: Decimal,
    pub observations: Option<String>,
}

impl ContractData {
    /// Filename the browser should save the contract as.
    ///
    /// Uses only the CPF digits so the name is filesystem-safe.
    #[must_use]
    pub fn filename(&self) -> String {
        let cpf_digits = wheels_core::cpf::digits(&self.cpf);
        format!("Contrato_Aluguel_Bike_{cpf_digits}_{}.pdf", self.bike.id)
    }

    /// Render the contract to PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] if the PDF backend fails.
    pub fn render(&self) -> Result<Vec<u8>, ContractError> {
        let (doc, page, layer) = PdfDocument::new(
            "Contrato de Aluguel de Bicicleta",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Contrato",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        let layer = doc.get_page(page).get_layer(layer);
        let mut cursor = Cursor::new(layer, regular, bold);

        cursor.title("CONTRATO DE ALUGUEL DE BICICLETA");
        cursor.blank();

        cursor.heading("1. CONTRATANTE");
        cursor.line(&format!("Nome: {}", self.customer_name));
        cursor.line(&format!("CPF: {}", self.cpf));
        cursor.line(&format!("Celular: {}", self.celular));
        cursor.line(&format!("E-mail: {}", self.email));
        cursor.blank();

        cursor.heading("2. OBJETO");
        cursor.line(&format!(
            "Bicicleta: {} (código {})",
            self.bike.modelo, self.bike.id
        ));
        if !self.bike.descricao.is_empty() {
            cursor.line(&format!("Descrição: {}", self.bike.descricao));
        }
        cursor.blank();

        cursor.heading("3. PERÍODO");
        cursor.line(&format!(
            "Retirada: {}",
            self.rental_start.format("%d/%m/%Y %H:%M")
        ));
        cursor.line(&format!(
            "Devolução prevista: {}",
            self.expected_return.format("%d/%m/%Y %H:%M")
        ));
        cursor.blank();

        cursor.heading("4. VALORES");
        cursor.line(&format!(
            "Valor por hora: {}",
            format_brl(self.bike.valor_hora)
        ));
        cursor.line(&format!("Valor total: {}", format_brl(self.total)));
        cursor.line(&format!(
            "Taxa de atraso (por hora): {}",
            format_brl(self.bike.taxa_atraso)
        ));
        cursor.line(&format!(
            "Taxa por dano: {}",
            format_brl(self.bike.taxa_dano)
        ));
        cursor.blank();

        cursor.heading("5. CLÁUSULAS");
        cursor.line("5.1. O contratante declara ter recebido a bicicleta em perfeito estado.");
        cursor.line("5.2. A devolução após o horário previsto incorre na taxa de atraso");
        cursor.line("por hora ou fração.");
        cursor.line("5.3. Danos constatados na devolução incorrem na taxa por dano.");
        cursor.line("5.4. A bicicleta é de uso pessoal e intransferível do contratante.");
        cursor.blank();

        if let Some(obs) = self.observations.as_deref().filter(|o| !o.is_empty()) {
            cursor.heading("6. OBSERVAÇÕES");
            cursor.line(obs);
            cursor.blank();
        }

        cursor.blank();
        cursor.line("_________________________________________");
        cursor.line("Assinatura do contratante");
        cursor.blank();
        cursor.line(&format!(
            "Emitido em {}",
            self.rental_start.format("%d/%m/%Y")
        ));

        Ok(doc.save_to_bytes()?)
    }
}

/// Tracks the vertical write position on the page.
struct Cursor {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Cursor {
    fn new(layer: PdfLayerReference, regular: IndirectFontRef, bold: IndirectFontRef) -> Self {
        Self {
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn title(&mut self, text: &str) {
        self.layer
            .use_text(text, 16.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT_MM * 1.5;
    }

    fn heading(&mut self, text: &str) {
        self.layer
            .use_text(text, 12.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT_MM;
    }

    fn line(&mut self, text: &str) {
        self.layer
            .use_text(text, 11.0, Mm(MARGIN_MM), Mm(self.y), &self.regular);
        self.y -= LINE_HEIGHT_MM;
    }

    fn blank(&mut self) {
        self.y -= LINE_HEIGHT_MM / 2.0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use wheels_core::BikeId;

    use super::*;

    fn data() -> ContractData {
        ContractData {
            customer_name: "Maria Souza".to_string(),
            cpf: "529.982.247-25".to_string(),
            celular: "(11) 98765-4321".to_string(),
            email: "maria@example.com".to_string(),
            bike: Bike {
                id: BikeId::new(3),
                modelo: "Caloi Elite".to_string(),
                descricao: "Aro 29".to_string(),
                infantil: false,
                disponivel: true,
                valor_hora: Decimal::from_str("12.50").unwrap(),
                taxa_atraso: Decimal::from_str("5.00").unwrap(),
                taxa_dano: Decimal::from_str("150.00").unwrap(),
            },
            rental_start: NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            expected_return: NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            total: Decimal::from_str("37.50").unwrap(),
            observations: None,
        }
    }

    #[test]
    fn test_filename_uses_cpf_digits_and_bike_id() {
        assert_eq!(
            data().filename(),
            "Contrato_Aluguel_Bike_52998224725_3.pdf"
        );
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = data().render().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_with_observations() {
        let mut contract = data();
        contract.observations = Some("Entregar com capacete.".to_string());
        assert!(contract.render().is_ok());
    }
}
