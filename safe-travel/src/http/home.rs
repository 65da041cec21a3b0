use axum::Json;

pub async fn home() -> Json<&'static str> {
    Json("Safe Travel: register or log in to find a travel group")
}
