//! Demo data: three brands, five influencers, two live campaigns with
//! applications and messages, and one admin.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use upfluence_db::Database;
use upfluence_db::batch::Batch;
use upfluence_db::models::{
    ApplicationSeed, CreateAccount, NewAccount, NewCampaign, NewInfluencerProfile, NewMessage,
    NewSocialProfile,
};
use upfluence_types::models::{
    ApplicationStatus, CampaignStatus, MessageStatus, PlanType, Role, SocialPlatform,
};

use crate::password::hash_password;

pub const DEMO_PASSWORD: &str = "password123";
pub const ADMIN_EMAIL: &str = "admin@upfluence.com";
pub const ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub brands: usize,
    pub influencers: usize,
    pub campaigns: usize,
    pub applications: usize,
    pub messages: usize,
    pub admins: usize,
}

struct BrandSeed {
    email: &'static str,
    name: &'static str,
    company: &'static str,
    website: &'static str,
    description: &'static str,
    plan: PlanType,
}

const BRANDS: &[BrandSeed] = &[
    BrandSeed {
        email: "sarah@fashionnova.com",
        name: "Sarah Miller",
        company: "Fashion Nova",
        website: "https://fashionnova.com",
        description: "Fast fashion brand targeting young women",
        plan: PlanType::Pro,
    },
    BrandSeed {
        email: "mike@techgadgets.com",
        name: "Mike Johnson",
        company: "Tech Gadgets Co",
        website: "https://techgadgets.com",
        description: "Electronics and gadget retailer",
        plan: PlanType::Agency,
    },
    BrandSeed {
        email: "emma@wellnessbrand.com",
        name: "Emma Davis",
        company: "Wellness Brand",
        website: "https://wellnessbrand.com",
        description: "Health and wellness products",
        plan: PlanType::Free,
    },
];

struct SocialSeed {
    platform: SocialPlatform,
    username: &'static str,
    url: &'static str,
    followers: i64,
    engagement: f64,
    avg_likes: i64,
    avg_comments: i64,
    verified: bool,
}

struct InfluencerSeed {
    email: &'static str,
    name: &'static str,
    avatar: &'static str,
    bio: &'static str,
    location: &'static str,
    categories: &'static [&'static str],
    languages: &'static [&'static str],
    rate: i64,
    verified: bool,
    available: bool,
    socials: &'static [SocialSeed],
}

const INFLUENCERS: &[InfluencerSeed] = &[
    InfluencerSeed {
        email: "sarah@lifestyle.com",
        name: "Sarah Johnson",
        avatar: "https://images.unsplash.com/photo-1494790108755-2616b32bd413?w=150&h=150&fit=crop&crop=face",
        bio: "Lifestyle blogger passionate about sustainable fashion and wellness. Collaborating with eco-friendly brands to promote conscious living.",
        location: "Los Angeles, CA",
        categories: &["Fashion", "Lifestyle", "Sustainability"],
        languages: &["English", "Spanish"],
        rate: 1200,
        verified: true,
        available: true,
        socials: &[
            SocialSeed {
                platform: SocialPlatform::Instagram,
                username: "sarah.lifestyle",
                url: "https://instagram.com/sarah.lifestyle",
                followers: 125_000,
                engagement: 4.8,
                avg_likes: 6000,
                avg_comments: 250,
                verified: true,
            },
            SocialSeed {
                platform: SocialPlatform::Youtube,
                username: "Sarah Johnson",
                url: "https://youtube.com/@sarahjohnson",
                followers: 45_000,
                engagement: 6.2,
                avg_likes: 2800,
                avg_comments: 120,
                verified: false,
            },
        ],
    },
    InfluencerSeed {
        email: "mike@foodie.com",
        name: "Mike Chen",
        avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
        bio: "Food enthusiast and chef sharing recipes from around the world. Specializing in Asian cuisine and cooking tutorials.",
        location: "New York, NY",
        categories: &["Food", "Cooking", "Travel"],
        languages: &["English", "Mandarin"],
        rate: 1800,
        verified: true,
        available: true,
        socials: &[
            SocialSeed {
                platform: SocialPlatform::Instagram,
                username: "mikeeats",
                url: "https://instagram.com/mikeeats",
                followers: 89_000,
                engagement: 5.2,
                avg_likes: 4600,
                avg_comments: 180,
                verified: true,
            },
            SocialSeed {
                platform: SocialPlatform::Youtube,
                username: "Mike Chen",
                url: "https://youtube.com/@mikechen",
                followers: 156_000,
                engagement: 7.1,
                avg_likes: 11_000,
                avg_comments: 450,
                verified: true,
            },
            SocialSeed {
                platform: SocialPlatform::Tiktok,
                username: "mikeeats",
                url: "https://tiktok.com/@mikeeats",
                followers: 234_000,
                engagement: 8.4,
                avg_likes: 19_600,
                avg_comments: 890,
                verified: true,
            },
        ],
    },
    InfluencerSeed {
        email: "emma@fitness.com",
        name: "Emma Wilson",
        avatar: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
        bio: "Certified personal trainer helping people achieve their fitness goals. Promoting health and wellness through movement.",
        location: "Miami, FL",
        categories: &["Fitness", "Health", "Wellness"],
        languages: &["English"],
        rate: 800,
        verified: false,
        available: true,
        socials: &[
            SocialSeed {
                platform: SocialPlatform::Instagram,
                username: "emmafitness",
                url: "https://instagram.com/emmafitness",
                followers: 67_000,
                engagement: 6.8,
                avg_likes: 4550,
                avg_comments: 320,
                verified: false,
            },
            SocialSeed {
                platform: SocialPlatform::Tiktok,
                username: "emmafitness",
                url: "https://tiktok.com/@emmafitness",
                followers: 145_000,
                engagement: 9.2,
                avg_likes: 13_340,
                avg_comments: 780,
                verified: false,
            },
        ],
    },
    InfluencerSeed {
        email: "alex@tech.com",
        name: "Alex Rodriguez",
        avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
        bio: "Tech reviewer and gadget enthusiast. Covering the latest in smartphones, laptops, and emerging technology.",
        location: "San Francisco, CA",
        categories: &["Technology", "Gaming", "Reviews"],
        languages: &["English"],
        rate: 2500,
        verified: true,
        available: false,
        socials: &[
            SocialSeed {
                platform: SocialPlatform::Youtube,
                username: "Alex Rodriguez",
                url: "https://youtube.com/@alextech",
                followers: 298_000,
                engagement: 5.9,
                avg_likes: 17_580,
                avg_comments: 920,
                verified: true,
            },
            SocialSeed {
                platform: SocialPlatform::Instagram,
                username: "alextech",
                url: "https://instagram.com/alextech",
                followers: 78_000,
                engagement: 4.1,
                avg_likes: 3200,
                avg_comments: 150,
                verified: true,
            },
        ],
    },
    InfluencerSeed {
        email: "lisa@beauty.com",
        name: "Lisa Park",
        avatar: "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=150&h=150&fit=crop&crop=face",
        bio: "Beauty guru and makeup artist. Sharing tutorials, product reviews, and skincare tips for all skin types.",
        location: "Chicago, IL",
        categories: &["Beauty", "Skincare", "Makeup"],
        languages: &["English", "Korean"],
        rate: 1500,
        verified: true,
        available: true,
        socials: &[
            SocialSeed {
                platform: SocialPlatform::Instagram,
                username: "lisabeauty",
                url: "https://instagram.com/lisabeauty",
                followers: 189_000,
                engagement: 5.8,
                avg_likes: 10_962,
                avg_comments: 420,
                verified: true,
            },
            SocialSeed {
                platform: SocialPlatform::Youtube,
                username: "Lisa Park Beauty",
                url: "https://youtube.com/@lisaparkbeauty",
                followers: 95_000,
                engagement: 7.3,
                avg_likes: 6935,
                avg_comments: 280,
                verified: true,
            },
            SocialSeed {
                platform: SocialPlatform::Tiktok,
                username: "lisabeauty",
                url: "https://tiktok.com/@lisabeauty",
                followers: 312_000,
                engagement: 11.2,
                avg_likes: 34_944,
                avg_comments: 1200,
                verified: true,
            },
        ],
    },
];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn create(batch: &Batch<'_>, account: &NewAccount) -> Result<Uuid> {
    match batch.create_account(account)? {
        CreateAccount::Created(id) => Ok(id),
        CreateAccount::EmailTaken => anyhow::bail!("seed account {} already exists", account.email),
    }
}

fn brand_account(seed: &BrandSeed, password_hash: &str) -> NewAccount {
    NewAccount {
        name: seed.name.into(),
        email: seed.email.into(),
        password_hash: password_hash.into(),
        role: Role::Brand,
        avatar: None,
        company: Some(seed.company.into()),
        website: Some(seed.website.into()),
        description: Some(seed.description.into()),
        plan_type: seed.plan,
        influencer_profile: None,
    }
}

fn influencer_account(seed: &InfluencerSeed, password_hash: &str) -> NewAccount {
    let social_profiles = seed
        .socials
        .iter()
        .map(|s| NewSocialProfile {
            platform: s.platform,
            username: s.username.into(),
            url: Some(s.url.into()),
            followers_count: s.followers,
            engagement_rate: s.engagement,
            avg_likes: s.avg_likes,
            avg_comments: s.avg_comments,
            is_verified: s.verified,
        })
        .collect();

    NewAccount {
        name: seed.name.into(),
        email: seed.email.into(),
        password_hash: password_hash.into(),
        role: Role::Influencer,
        avatar: Some(seed.avatar.into()),
        company: None,
        website: None,
        description: None,
        plan_type: PlanType::Free,
        influencer_profile: Some(NewInfluencerProfile {
            bio: seed.bio.into(),
            location: Some(seed.location.into()),
            category: strings(seed.categories),
            languages: strings(seed.languages),
            rate: Some(seed.rate),
            is_verified: seed.verified,
            is_available: seed.available,
            profile_completed: true,
            social_profiles,
        }),
    }
}

/// Wipes the database and loads the demo data set. Runs as one transaction, so
/// a failure leaves the previous contents in place.
pub fn run(db: &Database) -> Result<SeedSummary> {
    let demo_hash = hash_password(DEMO_PASSWORD)?;
    let admin_hash = hash_password(ADMIN_PASSWORD)?;

    let summary = db.batch(|batch| load(batch, &demo_hash, admin_hash))?;
    info!(?summary, "Database seeded");
    Ok(summary)
}

fn load(batch: &Batch<'_>, demo_hash: &str, admin_hash: String) -> Result<SeedSummary> {
    batch.reset_all().context("failed to clear existing data")?;

    let brands = BRANDS
        .iter()
        .map(|seed| create(batch, &brand_account(seed, demo_hash)))
        .collect::<Result<Vec<_>>>()?;

    let influencers = INFLUENCERS
        .iter()
        .map(|seed| create(batch, &influencer_account(seed, demo_hash)))
        .collect::<Result<Vec<_>>>()?;

    let profiles = influencers
        .iter()
        .map(|&user_id| {
            batch.influencer_profile_id(user_id)?
                .with_context(|| format!("influencer {user_id} has no profile"))
        })
        .collect::<Result<Vec<_>>>()?;

    let summer = batch.create_campaign(&NewCampaign {
        brand_id: brands[0],
        title: "Summer Collection Launch".into(),
        description: "Promote our new summer collection with lifestyle content showcasing the versatility and style of our pieces.".into(),
        category: strings(&["Fashion", "Lifestyle"]),
        budget: 15_000,
        requirements: Some("Must include product shots, lifestyle photos, and authentic styling. Please tag @fashionnova and use #SummerVibes".into()),
        platforms: vec![SocialPlatform::Instagram, SocialPlatform::Tiktok],
        min_followers: Some(50_000),
        max_followers: Some(500_000),
        target_age: Some("18-35".into()),
        target_gender: Some("Female".into()),
        target_location: strings(&["United States", "Canada"]),
        status: CampaignStatus::Active,
        start_date: date(2024, 7, 1),
        end_date: date(2024, 8, 31),
    })?;

    let reviews = batch.create_campaign(&NewCampaign {
        brand_id: brands[1],
        title: "Tech Product Reviews".into(),
        description: "Honest reviews of our latest smartphone accessories and gadgets. Looking for tech enthusiasts with engaged audiences.".into(),
        category: strings(&["Technology", "Reviews"]),
        budget: 25_000,
        requirements: Some("Unboxing videos, detailed reviews, and comparison content. Must disclose partnership clearly.".into()),
        platforms: vec![SocialPlatform::Youtube, SocialPlatform::Instagram],
        min_followers: Some(100_000),
        max_followers: None,
        target_age: Some("25-45".into()),
        target_gender: Some("All".into()),
        target_location: strings(&["United States", "United Kingdom", "Australia"]),
        status: CampaignStatus::Active,
        start_date: date(2024, 8, 1),
        end_date: date(2024, 9, 30),
    })?;

    let applications = [
        ApplicationSeed {
            campaign_id: summer.id,
            influencer_id: profiles[0],
            status: ApplicationStatus::Accepted,
            message: Some("I love your brand aesthetic and would be excited to create content showcasing the summer collection!".into()),
        },
        ApplicationSeed {
            campaign_id: summer.id,
            influencer_id: profiles[2],
            status: ApplicationStatus::Pending,
            message: Some("Your summer collection aligns perfectly with my fitness and wellness content. I can create workout outfit posts!".into()),
        },
        ApplicationSeed {
            campaign_id: reviews.id,
            influencer_id: profiles[3],
            status: ApplicationStatus::Accepted,
            message: Some("As a tech reviewer, I would love to create detailed content about your latest products.".into()),
        },
    ];
    for application in &applications {
        batch.insert_application(application)?;
    }

    let messages = [
        NewMessage {
            sender_id: influencers[0],
            receiver_id: brands[0],
            campaign_id: Some(summer.id),
            subject: "Summer Campaign Collaboration".into(),
            content: "Hi! I'm really excited about your summer collection campaign. I have some creative ideas for showcasing the pieces in authentic lifestyle settings. Would love to discuss the collaboration details!".into(),
            status: MessageStatus::Sent,
        },
        NewMessage {
            sender_id: brands[0],
            receiver_id: influencers[0],
            campaign_id: Some(summer.id),
            subject: "Re: Summer Campaign Collaboration".into(),
            content: "Thank you for your interest! We love your content style and think you'd be perfect for this campaign. Let's schedule a call to discuss the details and timeline.".into(),
            status: MessageStatus::Read,
        },
        NewMessage {
            sender_id: influencers[1],
            receiver_id: brands[1],
            campaign_id: None,
            subject: "Food Tech Content Opportunity".into(),
            content: "Hello! I noticed you have some amazing kitchen gadgets. As a food content creator, I'd love to explore partnership opportunities for authentic product integration in my cooking videos.".into(),
            status: MessageStatus::Sent,
        },
    ];
    for message in &messages {
        batch.insert_message(message)?;
    }

    create(
        batch,
        &NewAccount {
            name: "Admin User".into(),
            email: ADMIN_EMAIL.into(),
            password_hash: admin_hash,
            role: Role::Admin,
            avatar: None,
            company: None,
            website: None,
            description: None,
            plan_type: PlanType::Agency,
            influencer_profile: None,
        },
    )?;

    Ok(SeedSummary {
        brands: brands.len(),
        influencers: influencers.len(),
        campaigns: 2,
        applications: applications.len(),
        messages: messages.len(),
        admins: 1,
    })
}
