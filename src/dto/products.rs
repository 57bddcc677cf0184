use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dto::double_option,
    error::{AppError, AppResult},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub categorie_id: Option<i64>,
    pub prix: Option<f64>,
    pub stock: Option<i32>,
    pub date_ajout: Option<NaiveDate>,
    pub nom: Option<String>,
    pub image_path: Option<String>,
    pub description: Option<String>,
}

/// Every field is optional; only supplied fields are written.
/// `"categorie_id": null` clears the category.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub categorie_id: Option<Option<i64>>,
    pub prix: Option<f64>,
    pub stock: Option<i32>,
    pub date_ajout: Option<NaiveDate>,
    pub nom: Option<String>,
    pub image_path: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct NewProduct {
    pub categorie_id: Option<i64>,
    pub prix: f64,
    pub stock: i32,
    pub date_ajout: NaiveDate,
    pub nom: String,
    pub image_path: String,
    pub description: String,
}

fn check_numbers(prix: Option<f64>, stock: Option<i32>) -> AppResult<()> {
    if let Some(prix) = prix {
        if !prix.is_finite() || prix < 0.0 {
            return Err(AppError::BadRequest("prix must be a non-negative number".into()));
        }
    }
    if let Some(stock) = stock {
        if stock < 0 {
            return Err(AppError::BadRequest("stock must not be negative".into()));
        }
    }
    Ok(())
}

impl CreateProductRequest {
    pub fn validate(self) -> AppResult<NewProduct> {
        let nom = self
            .nom
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let (Some(prix), Some(stock), Some(date_ajout), Some(nom)) =
            (self.prix, self.stock, self.date_ajout, nom)
        else {
            return Err(AppError::BadRequest(
                "prix, stock, date_ajout and nom are required".into(),
            ));
        };
        check_numbers(Some(prix), Some(stock))?;

        Ok(NewProduct {
            categorie_id: self.categorie_id,
            prix,
            stock,
            date_ajout,
            nom,
            image_path: self.image_path.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}

impl UpdateProductRequest {
    pub fn validate(self) -> AppResult<Self> {
        if matches!(self.nom.as_deref().map(str::trim), Some("")) {
            return Err(AppError::BadRequest("nom must not be empty".into()));
        }
        check_numbers(self.prix, self.stock)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> CreateProductRequest {
        CreateProductRequest {
            prix: Some(100.0),
            stock: Some(5),
            date_ajout: NaiveDate::from_ymd_opt(2024, 1, 1),
            nom: Some("Widget".into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_accepts_minimal_product() {
        let product = widget().validate().unwrap();
        assert_eq!(product.nom, "Widget");
        assert_eq!(product.image_path, "");
        assert_eq!(product.description, "");
        assert_eq!(product.categorie_id, None);
    }

    #[test]
    fn zero_stock_counts_as_present() {
        let product = CreateProductRequest {
            stock: Some(0),
            ..widget()
        }
        .validate()
        .unwrap();
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn create_rejects_each_missing_required_field() {
        let cases = [
            CreateProductRequest { prix: None, ..widget() },
            CreateProductRequest { stock: None, ..widget() },
            CreateProductRequest { date_ajout: None, ..widget() },
            CreateProductRequest { nom: None, ..widget() },
            CreateProductRequest { nom: Some(" ".into()), ..widget() },
        ];
        for case in cases {
            assert!(matches!(case.validate(), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn update_rejects_blank_name_and_negative_stock() {
        let blank = UpdateProductRequest {
            nom: Some("".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let negative = UpdateProductRequest {
            stock: Some(-3),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        assert!(UpdateProductRequest::default().validate().is_ok());
    }

    #[test]
    fn update_distinguishes_null_category_from_absent() {
        let cleared: UpdateProductRequest =
            serde_json::from_str(r#"{"categorie_id":null}"#).unwrap();
        assert_eq!(cleared.categorie_id, Some(None));

        let absent: UpdateProductRequest = serde_json::from_str(r#"{"stock":2}"#).unwrap();
        assert_eq!(absent.categorie_id, None);
    }
}
