//! Launch stories, used to seed the in-memory store.

use relweb_common::{Category, StoryRecord};

pub fn default_stories() -> Vec<StoryRecord> {
    vec![
        StoryRecord::new(
            "1",
            "Networked Abundance",
            "I have a dream of a local grocery co-op... As it turns out, so do 1,000 other people. \
             And, they have a ton of resources and skills! A community of action forms to bring our \
             shared dream to life.",
            Category::Abundance,
            48,
        ),
        StoryRecord::new(
            "2",
            "Prosocial 'Care to Comment'",
            "Before you comment... Are your needs met? Get support now. Are the commenters' needs \
             met? Organize to support them. Still want to post? Get a reminder from your \
             self-reflections.",
            Category::Care,
            37,
        ),
        StoryRecord::new(
            "3",
            "'Operation Pronoia', aka True Community AI",
            "Networks of communities equipped with open-source LLMs, community-governed knowledge \
             bases, and community deliberation for the community AI's goals. Enables hyperlocal and \
             internet-wide connections. Sneaking suspicion that the social universe is conspiring \
             in your favor.",
            Category::Ai,
            52,
        ),
        StoryRecord::new(
            "8",
            "Humans and Non-Humans",
            "In our neighborhood network, trees and plants and pets and wild animals all have names \
             and profiles and backstories, and participate in our mutual aid network, sharing their \
             needs and offers and aspirations (human-translated) with humans.",
            Category::Community,
            50,
        ),
        StoryRecord::new(
            "4",
            "Prosocial AI",
            "You upload some family financials to an AI chat and get some great suggested actions. \
             Even better, you get offers to connect with five other families facing surprisingly \
             similar situations, and one who navigated all of this successfully over the past year!",
            Category::Ai,
            41,
        ),
        StoryRecord::new(
            "5",
            "Prosocial Wikipedia",
            "You're reading about planting onion seeds and then get invited to connect with 3 people \
             in your neighborhood who were reading that same article this week.",
            Category::Learning,
            42,
        ),
        StoryRecord::new(
            "6",
            "Neighborhood Skill Exchange",
            "As you watch a DIY home repair video, you're connected with a retired contractor two \
             blocks away who's available this weekend to help guide you through the process.",
            Category::Community,
            37,
        ),
        StoryRecord::new(
            "7",
            "Relational Rideshare",
            "Recognizing that car journeys are an ideal place for a real conversation, matched \
             riders and drivers in our community equip one another with conversation-starting \
             questions to ask!",
            Category::Community,
            45,
        ),
    ]
}
