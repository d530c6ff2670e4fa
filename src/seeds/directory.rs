//! Demo directory seed
//!
//! Inserts four bases and four farmers with explicit ids, links farmer N to base N and attaches a
//! product listing for each of the four seasons. Explicit ids bypass the id generators; creates
//! that follow rely on [`crate::db::advance_id_sequence`] to skip past them.

use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone,
};

use crate::db::advance_id_sequence;
use crate::models::{base, farmer, farmer_base, seasonal_product};

const BLOB_HOST: &str = "https://gnxhvbmaxwh7z9dw.public.blob.vercel-storage.com";

struct SeedBase {
    id: i32,
    name: &'static str,
    area: &'static str,
    station: &'static str,
    address: &'static str,
    description: &'static str,
    image: &'static str,
}

struct SeedFarmer {
    id: i32,
    name: &'static str,
    location: &'static str,
    representative_name: &'static str,
    short_description: &'static str,
    full_description: &'static str,
    representative_image: &'static str,
    promotion_image: &'static str,
    map_query: &'static str,
    delivery_frequency: &'static str,
    delivery_time: &'static str,
    interaction_frequency: &'static str,
    interaction_details: &'static str,
    /// Products for 3-5月, 6-8月, 9-11月 and 12-2月
    products: [&'static str; 4],
}

const SEASONS: [&str; 4] = ["3-5月", "6-8月", "9-11月", "12-2月"];

const BASES: [SeedBase; 4] = [
    SeedBase {
        id: 1,
        name: "Nui. HOSTEL & BAR LOUNGE",
        area: "台東区エリア",
        station: "蔵前駅",
        address: "東京都台東区蔵前2丁目14-13",
        description: "Nui.は2012年に老舗おもちゃ会社の倉庫を改装し、コーヒーやお酒、食事を目的に人が訪れるラウンジと、世界中から旅行者を迎えるホステルとして生まれました。\n\n「あらゆる境界線を越えて、人々が集える場所を。」という理念のもと、国籍や宗教、年齢や職業関係なく、さまざまな人が自由な空気感のもと集う景色を創造しています。\n\nCSA LOOPは農作物の生産者と消費者を直接つなげ、新たなコミュニティを生む可能性があると感じています。",
        image: "bases/1/base-JqdwWTOVPhkIi6FNjor6A0eUQwxi1P.png",
    },
    SeedBase {
        id: 2,
        name: "GREEN COFFEE ROASTERS",
        area: "世田谷区エリア",
        station: "三軒茶屋駅",
        address: "東京都世田谷区三軒茶屋1-1-1",
        description: "2015年にオープンした自家焙煎のコーヒーショップです。\n\nコーヒーを通じて、生産者と消費者をつなぎ、持続可能な関係性を築くことを目指しています。\n\n店内では焙煎の香りと共に、地域の人々が集う憩いの場を提供しています。",
        image: "bases/2/base-BFTgxArSlko3Zcp5EmAAURo6UPKAwf.png",
    },
    SeedBase {
        id: 3,
        name: "FARM TO TABLE CAFE",
        area: "練馬区エリア",
        station: "練馬駅",
        address: "東京都練馬区練馬3-3-3",
        description: "地産地消をコンセプトにした、農家直営のカフェレストランです。\n\n練馬の豊かな農業の魅力を多くの人に知ってもらいたいという想いから始まりました。\n\n季節の野菜を使ったメニューと、くつろぎの空間で、都会の中の農的生活を体験できます。",
        image: "bases/3/base-vYRuXK3MuulaAr0NTacg8lPZDDtaUL.png",
    },
    SeedBase {
        id: 4,
        name: "SUNRISE MARKET & CAFE",
        area: "江東区エリア",
        station: "木場駅",
        address: "東京都江東区木場2-2-2",
        description: "朝市からスタートした、コミュニティマーケット＆カフェです。\n\n地域の農家さんやクリエイターが集まり、食と文化の交流の場として親しまれています。\n\n定期的に開催されるワークショップやマルシェを通じて、持続可能な地域づくりを目指しています。",
        image: "bases/4/base-w1bGOwg6mMkRGi8zcpTdRTuaElwiPd.png",
    },
];

const FARMERS: [SeedFarmer; 4] = [
    SeedFarmer {
        id: 1,
        name: "まぁずファーム",
        location: "千葉県 / 香取市",
        representative_name: "山田太郎",
        short_description: "ちば香取のニコニコ野菜とこだわりのお米をお届けします",
        full_description: "農業をもっと魅力的な仕事に変えて、次世代に繋いでいきたい。\n\nそんな思いから、市役所を早期退職した夫とふたり『まぁずファーム』を始めました。\n\n基本は有機無農薬。やむを得ず農薬を使用する場合もありますが、予防的に薬剤を使用することはありません。\n\n安全安心なニコニコ野菜を食卓にお届けするため、笑顔溢れる家族経営で農業に取り組んでいます。",
        representative_image: "farmers/1/representative-7nUxaGFuXfiLSJHIsbRJYnpK3AxO1o.png",
        promotion_image: "farmers/1/promotion-GEguCUkgTGUQFVHEM18Bga54cPtMv4.png",
        map_query: "千葉県香取市",
        delivery_frequency: "１ヶ月に１回（年間10回）",
        delivery_time: "最終週の日曜日10:00〜12:00（目安）を予定。1.2月はお休み予定",
        interaction_frequency: "不定期（年間2回程度）",
        interaction_details: "農業体験（収穫などを体験する機会）、オープンファーム（交流イベントとして会員の方々と畑の野菜を使った食事などを通して親睦を深める）",
        products: [
            "大根\nキャベツ\nサラダ野菜類\n小かぶ\nスティックブロッコリー\nパクチー",
            "じゃがいも\n玉ねぎ\nにんじん\n茄子\nピーマン\nかぼちゃ\nトウガラシ\nにんにく\nパクチー",
            "茄子\n枝豆\n大根\n冬瓜\n茹で落花生\nさつまいも\n豆類\nサラダ野菜類\nパクチー",
            "白菜\n里芋\nハヤトウリ\nかぼちゃ\n芽キャベツ\nスティックブロッコリー",
        ],
    },
    SeedFarmer {
        id: 2,
        name: "太陽の恵み農園",
        location: "神奈川県 / 小田原市",
        representative_name: "鈴木一郎",
        short_description: "安心安全な野菜づくりにこだわる、湘南の自然派農園",
        full_description: "20年以上、有機農業に取り組んできました。\n\n土づくりからこだわり、微生物の力を活かした栽培方法で、味わい深い野菜を育てています。\n\n季節の移ろいを感じられる、多品目の野菜作りを心がけています。",
        representative_image: "farmers/2/representative-5DGqHnTrHYY43yHEBWZO04a5ZB6ddV.png",
        promotion_image: "farmers/2/promotion-TIppPcLtYUlWawQAhZPdpFy0OMmCql.png",
        map_query: "神奈川県小田原市",
        delivery_frequency: "１ヶ月に１回（年間12回）",
        delivery_time: "第3土曜日13:00〜15:00（目安）",
        interaction_frequency: "年間2-3回程度",
        interaction_details: "収穫体験、料理教室、農場見学会",
        products: [
            "春キャベツ\n新玉ねぎ\nアスパラガス\nそら豆\n春菊",
            "トマト\nきゅうり\nなす\nオクラ\nズッキーニ",
            "さつまいも\nかぼちゃ\n秋ナス\n里芋\n白菜",
            "大根\nほうれん草\nブロッコリー\nカリフラワー\n青菜",
        ],
    },
    SeedFarmer {
        id: 3,
        name: "グリーンハーベスト",
        location: "埼玉県 / 川越市",
        representative_name: "佐藤めぐみ",
        short_description: "都市近郊で育てる、新鮮な季節の野菜",
        full_description: "女性農業者として、持続可能な農業の実現に取り組んでいます。\n\n化学肥料に頼らない栽培方法と、地域の環境に適した品種選びにこだわっています。\n\n収穫したその日のうちに届けられる新鮮さが自慢です。",
        representative_image: "farmers/3/representative-jmQpaJ81U15pUsNF5OFq1zhYgs37Y8.png",
        promotion_image: "farmers/3/promotion-QD18CRV2RvrIFD3S21lo0FBtlDPR3v.png",
        map_query: "埼玉県川越市",
        delivery_frequency: "１ヶ月に１回（年間11回）",
        delivery_time: "第2日曜日11:00〜14:00（目安）",
        interaction_frequency: "年間2回程度",
        interaction_details: "農業体験、収穫祭、地域交流イベント",
        products: [
            "春野菜ミックス\nふき\nたけのこ\n山菜\nレタス",
            "夏野菜セット\nとうもろこし\nスイカ\nメロン\nマンゴー",
            "秋野菜セット\nきのこ類\n柿\n栗\nぶどう",
            "冬野菜セット\nかぶ\n白菜\n大根\nねぎ",
        ],
    },
    SeedFarmer {
        id: 4,
        name: "里山ファーム",
        location: "茨城県 / つくば市",
        representative_name: "田中誠",
        short_description: "伝統的な農法と現代技術の融合で作る体に優しい野菜",
        full_description: "代々受け継がれてきた農地で、先人の知恵と現代の技術を組み合わせた農業を実践しています。\n\n自然との共生を大切にし、生態系に配慮した栽培方法を採用。\n\n地域の農業の発展に貢献しながら、安全で美味しい野菜作りに励んでいます。",
        representative_image: "farmers/4/representative-sHfu0d9eoO1LON4Qg9LoWZX3ZhYxOc.png",
        promotion_image: "farmers/4/promotion-pJGGCla5fl4GgSjcT6pRDNElg8EFe7.png",
        map_query: "茨城県つくば市",
        delivery_frequency: "１ヶ月に１回（年間12回）",
        delivery_time: "第4土曜日10:00〜12:00（目安）",
        interaction_frequency: "年間3回程度",
        interaction_details: "農業体験、季節の収穫体験、料理教室",
        products: [
            "新じゃが\n新玉ねぎ\nグリーンピース\nアスパラ\n春キャベツ",
            "夏野菜ミックス\nトマト\nピーマン\nなす\nきゅうり",
            "根菜セット\nさつまいも\nかぼちゃ\nごぼう\nにんじん",
            "冬野菜セット\n白菜\n大根\nほうれん草\nねぎ",
        ],
    },
];

/// What a seed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded {
        bases: usize,
        farmers: usize,
        seasonal_products: usize,
    },
    /// Base 1 already existed; nothing was written
    AlreadySeeded,
}

fn blob_url(path: &str) -> String {
    format!("{BLOB_HOST}/{path}")
}

fn map_url(query: &str) -> String {
    format!("https://maps.google.com/?q={query}")
}

/// Seeds the demo directory in a single transaction.
///
/// Skips everything when base 1 already exists, so running it twice is harmless.
pub async fn seed_directory(db: &DatabaseConnection) -> Result<SeedOutcome> {
    if base::Entity::find_by_id(1).one(db).await?.is_some() {
        log::info!("Directory already seeded, skipping");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let txn = db.begin().await.context("begin seed transaction")?;
    let outcome = match insert_directory(&txn).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                log::error!("Failed to roll back seed transaction: {}", rollback_err);
            }
            log::error!("Error seeding directory: {:#}", err);
            return Err(err);
        }
    };
    txn.commit().await.context("commit seed transaction")?;

    log::info!("Directory seeded successfully: {:?}", outcome);
    Ok(outcome)
}

async fn insert_directory(txn: &DatabaseTransaction) -> Result<SeedOutcome> {
    let now = Utc::now().fixed_offset();

    for seed in &BASES {
        insert_base(txn, seed, now)
            .await
            .with_context(|| format!("insert base {}", seed.id))?;
    }

    let mut seasonal_products = 0;
    for seed in &FARMERS {
        insert_farmer(txn, seed, now)
            .await
            .with_context(|| format!("insert farmer {}", seed.id))?;
        seasonal_products += seed.products.len();
    }

    // Keep Postgres sequences ahead of the explicit ids written above.
    advance_id_sequence::<base::Entity, _>(txn).await?;
    advance_id_sequence::<farmer::Entity, _>(txn).await?;

    Ok(SeedOutcome::Seeded {
        bases: BASES.len(),
        farmers: FARMERS.len(),
        seasonal_products,
    })
}

async fn insert_base(
    txn: &DatabaseTransaction,
    seed: &SeedBase,
    now: DateTimeWithTimeZone,
) -> Result<()> {
    base::ActiveModel {
        id: Set(seed.id),
        name: Set(seed.name.to_string()),
        area: Set(Some(seed.area.to_string())),
        station: Set(Some(seed.station.to_string())),
        address: Set(Some(seed.address.to_string())),
        description: Set(Some(seed.description.to_string())),
        base_image_url: Set(Some(blob_url(seed.image))),
        google_map_url: Set(Some(map_url(seed.address))),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_farmer(
    txn: &DatabaseTransaction,
    seed: &SeedFarmer,
    now: DateTimeWithTimeZone,
) -> Result<()> {
    farmer::ActiveModel {
        id: Set(seed.id),
        name: Set(seed.name.to_string()),
        location: Set(Some(seed.location.to_string())),
        representative_name: Set(Some(seed.representative_name.to_string())),
        short_description: Set(Some(seed.short_description.to_string())),
        full_description: Set(Some(seed.full_description.to_string())),
        representative_image_url: Set(Some(blob_url(seed.representative_image))),
        promotion_image_url: Set(Some(blob_url(seed.promotion_image))),
        google_map_url: Set(Some(map_url(seed.map_query))),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    farmer_base::ActiveModel {
        farmer_id: Set(seed.id),
        base_id: Set(seed.id),
        delivery_frequency: Set(Some(seed.delivery_frequency.to_string())),
        delivery_time: Set(Some(seed.delivery_time.to_string())),
        interaction_frequency: Set(Some(seed.interaction_frequency.to_string())),
        interaction_details: Set(Some(seed.interaction_details.to_string())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    for (season, products) in SEASONS.iter().zip(seed.products) {
        seasonal_product::ActiveModel {
            farmer_id: Set(seed.id),
            season: Set(Some(season.to_string())),
            products: Set(Some(products.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }

    Ok(())
}
