//! The compiled-in catalog.

use voidshop_core::{Category, ImageRef, Price, Product, ProductId};

/// Sizes offered for clothing.
pub const CLOTHING_SIZES: [&str; 4] = ["S", "M", "L", "XL"];

/// Sizes offered for footwear.
pub const FOOTWEAR_SIZES: [&str; 5] = ["39", "40", "41", "42", "43"];

fn item(
    id: &str,
    name: &str,
    cents: u32,
    image: &str,
    category: Category,
    keywords: &[&str],
) -> Product {
    let variants: &[&str] = match category {
        Category::Clothing => &CLOTHING_SIZES,
        Category::Footwear => &FOOTWEAR_SIZES,
        _ => &[],
    };

    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        image: ImageRef::new(image),
        category,
        keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
        variants: variants.iter().map(|v| (*v).to_owned()).collect(),
    }
}

/// The twelve built-in products, in display order.
#[must_use]
pub fn builtin_products() -> Vec<Product> {
    vec![
        item(
            "1",
            "Xbox Headset",
            1099,
            "xbox_headset",
            Category::Games,
            &["headphones", "headset", "gaming", "xbox"],
        ),
        item(
            "2",
            "Razer DeathAdder Mouse",
            1549,
            "razer_deathadder_mouse",
            Category::Games,
            &["mouse", "razer", "gaming"],
        ),
        item(
            "3",
            "Keymove K61SE Keyboard",
            2200,
            "keymove_k61se_keyboard",
            Category::Games,
            &["keyboard", "mechanical", "60%"],
        ),
        item(
            "4",
            "Oversize Tee Black",
            1290,
            "oversize_tee_black",
            Category::Clothing,
            &["clothing", "tee", "t-shirt", "oversize", "unisex", "black"],
        ),
        item(
            "5",
            "Sleeveless Tee White",
            1150,
            "sleeveless_tee_white",
            Category::Clothing,
            &["clothing", "tee", "t-shirt", "sleeveless", "white"],
        ),
        item(
            "6",
            "Sleeved Tee Blue",
            1320,
            "sleeved_tee_blue",
            Category::Clothing,
            &["clothing", "tee", "t-shirt", "sleeves", "blue"],
        ),
        item(
            "7",
            "Napi Knife",
            9999,
            "napi_knife",
            Category::Kitchen,
            &["kitchen", "knife", "chef"],
        ),
        item(
            "8",
            "Spoon Set",
            3499,
            "spoon_set",
            Category::Kitchen,
            &["kitchen", "spoons", "set"],
        ),
        item(
            "9",
            "Jordan 1 Sneakers",
            2999,
            "jordan_1",
            Category::Footwear,
            &["footwear", "shoes", "sneakers", "jordan"],
        ),
        item(
            "10",
            "Salvatore Dress Shoes",
            5499,
            "salvatore_shoes",
            Category::Footwear,
            &["footwear", "shoes", "salvatore", "formal"],
        ),
        item(
            "11",
            "Sterling Silver 925 Bracelet",
            9999,
            "silver_925_bracelet",
            Category::Jewelry,
            &["jewelry", "bracelet", "silver", "925"],
        ),
        item(
            "12",
            "23K Gold Chain",
            19999,
            "gold_23k_chain",
            Category::Jewelry,
            &["jewelry", "chain", "gold", "23k"],
        ),
    ]
}
