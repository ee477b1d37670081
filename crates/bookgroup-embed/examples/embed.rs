use bookgroup_core::traits::Embedder;
use bookgroup_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder(None, bookgroup_embed::DEFAULT_MAX_LEN)?;
    let texts = vec!["a haunting gothic romance".to_string(), "a field guide to birds".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={}", embs.len(), embedder.dim());
    Ok(())
}
